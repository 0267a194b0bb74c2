use crate::error::{ReleaseError, Result};
use crate::vcs::VersionControl;
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock version control for testing without an actual repository
pub struct MockVersionControl {
    tags: RefCell<Vec<String>>,
    created: RefCell<Vec<String>>,
    published: RefCell<Vec<(String, String)>>,
    branch: Option<String>,
    modifications: HashMap<String, Vec<String>>,
}

impl MockVersionControl {
    /// Create an empty mock on branch `main`
    pub fn new() -> Self {
        MockVersionControl {
            tags: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            published: RefCell::new(Vec::new()),
            branch: Some("main".to_string()),
            modifications: HashMap::new(),
        }
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.borrow_mut().push(name.into());
    }

    /// Set the current branch; `None` simulates a detached HEAD
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(|b| b.to_string());
    }

    /// Register the commit summaries made since `tag`
    pub fn set_modifications(&mut self, tag: impl Into<String>, lines: &[&str]) {
        self.modifications
            .insert(tag.into(), lines.iter().map(|l| l.to_string()).collect());
    }

    /// Tags created through [VersionControl::create_tag]
    pub fn created_tags(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    /// `(tag, remote)` pairs pushed through [VersionControl::publish_tag]
    pub fn published_tags(&self) -> Vec<(String, String)> {
        self.published.borrow().clone()
    }
}

impl Default for MockVersionControl {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockVersionControl {
    fn tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().clone())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        if self.tags.borrow().iter().any(|t| t == name) {
            return Err(ReleaseError::vcs(format!("Tag '{}' already exists", name)));
        }

        self.tags.borrow_mut().push(name.to_string());
        self.created.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| ReleaseError::vcs("Not currently on any branch"))
    }

    fn modifications_since(&self, tag: &str, _exclude_merges: bool) -> Result<Vec<String>> {
        Ok(self.modifications.get(tag).cloned().unwrap_or_default())
    }

    fn publish_tag(&self, tag: &str, remote: &str) -> Result<()> {
        self.published
            .borrow_mut()
            .push((tag.to_string(), remote.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tags() {
        let mut vcs = MockVersionControl::new();
        vcs.add_tag("v1.0.0");
        vcs.create_tag("v2.0.0").unwrap();

        assert_eq!(vcs.tags().unwrap(), vec!["v1.0.0", "v2.0.0"]);
        assert_eq!(vcs.created_tags(), vec!["v2.0.0"]);
        assert!(vcs.create_tag("v1.0.0").is_err());
    }

    #[test]
    fn test_mock_branch() {
        let mut vcs = MockVersionControl::default();
        assert_eq!(vcs.current_branch().unwrap(), "main");

        vcs.set_branch(None);
        assert!(vcs.current_branch().is_err());
    }

    #[test]
    fn test_mock_modifications() {
        let mut vcs = MockVersionControl::new();
        vcs.set_modifications("v1.0.0", &["abc1234 fix parser"]);

        assert_eq!(
            vcs.modifications_since("v1.0.0", true).unwrap(),
            vec!["abc1234 fix parser"]
        );
        assert!(vcs.modifications_since("v0.1.0", true).unwrap().is_empty());
    }
}

use crate::error::{ReleaseError, Result};
use git2::{ObjectType, Repository};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2VersionControl {
    repo: Repository,
}

impl Git2VersionControl {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;

        Ok(Git2VersionControl { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Repository) -> Self {
        Git2VersionControl { repo }
    }
}

impl super::VersionControl for Git2VersionControl {
    fn tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let target = self
            .repo
            .head()
            .and_then(|head| head.peel(ObjectType::Commit))
            .map_err(|e| ReleaseError::vcs(format!("Cannot resolve HEAD to tag: {}", e)))?;

        let signature = self.repo.signature()?;

        self.repo
            .tag(name, &target, &signature, name, false)
            .map_err(|e| ReleaseError::vcs(format!("Cannot create tag '{}': {}", name, e)))?;

        debug!(tag = name, "Created annotated tag");
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| ReleaseError::vcs(format!("Cannot read HEAD: {}", e)))?;

        if !head.is_branch() {
            return Err(ReleaseError::vcs("Not currently on any branch"));
        }

        head.shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| ReleaseError::vcs("Branch name is not valid UTF-8"))
    }

    fn modifications_since(&self, tag: &str, exclude_merges: bool) -> Result<Vec<String>> {
        let since = self
            .repo
            .revparse_single(&format!("refs/tags/{}", tag))
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| ReleaseError::vcs(format!("Cannot find tag '{}': {}", tag, e)))?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.hide(since.id())?;

        let mut modifications = Vec::new();

        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;

            if exclude_merges && commit.parent_count() > 1 {
                continue;
            }

            let short_id = commit.as_object().short_id()?;
            modifications.push(format!(
                "{} {}",
                short_id.as_str().unwrap_or_default(),
                commit.summary().unwrap_or("(empty message)")
            ));
        }

        Ok(modifications)
    }

    fn publish_tag(&self, tag: &str, remote: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::vcs(format!("Cannot find remote: {}", e)))?;

        let refspec = format!("refs/tags/{}:refs/tags/{}", tag, tag);

        remote
            .push(&[refspec.as_str()], None)
            .map_err(|e| ReleaseError::vcs(format!("Push failed: {}", e)))?;

        Ok(())
    }
}

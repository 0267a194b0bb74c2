use crate::error::{ReleaseError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const BRANCH_NAME: &str = "branch-name";
const DATE: &str = "date";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]*)\}").expect("placeholder pattern is valid"))
}

/// Tag prefix template (e.g. "v", "release-{branch-name}-", "{date}/")
///
/// Supported placeholders are `{branch-name}` and `{date}`; the template is
/// checked for anything else when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagPrefix {
    template: String,
}

impl TagPrefix {
    /// Create a prefix template, rejecting unknown placeholders
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();

        for captures in placeholder_regex().captures_iter(&template) {
            let name = &captures[1];
            if name != BRANCH_NAME && name != DATE {
                return Err(unknown_placeholder(name));
            }
        }

        Ok(TagPrefix { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether resolving this prefix needs the current branch
    pub fn uses_branch(&self) -> bool {
        placeholder_regex()
            .captures_iter(&self.template)
            .any(|c| &c[1] == BRANCH_NAME)
    }

    /// Substitute placeholders.
    ///
    /// `branch` is called at most once, and only when the template references
    /// `{branch-name}`. `{date}` renders `today` as `YYYY-MM-DD`.
    pub fn resolve<F>(&self, mut branch: F, today: NaiveDate) -> Result<String>
    where
        F: FnMut() -> Result<String>,
    {
        let mut branch_name: Option<String> = None;
        let mut resolved = String::with_capacity(self.template.len());
        let mut last_end = 0;

        for captures in placeholder_regex().captures_iter(&self.template) {
            let token = captures.get(0).expect("group 0 always matches");
            resolved.push_str(&self.template[last_end..token.start()]);

            match &captures[1] {
                BRANCH_NAME => {
                    if branch_name.is_none() {
                        branch_name = Some(branch()?);
                    }
                    resolved.push_str(branch_name.as_deref().unwrap_or_default());
                }
                DATE => resolved.push_str(&today.format("%Y-%m-%d").to_string()),
                other => return Err(unknown_placeholder(other)),
            }

            last_end = token.end();
        }

        resolved.push_str(&self.template[last_end..]);
        Ok(resolved)
    }

    /// Build the tag name for a version under an already-resolved prefix
    pub fn format(resolved_prefix: &str, version: &str) -> String {
        format!("{}{}", resolved_prefix, version)
    }
}

fn unknown_placeholder(name: &str) -> ReleaseError {
    ReleaseError::config(format!(
        "There is no rule to process the prefix placeholder [{}]",
        name
    ))
}

/// Decides whether a tag is a release tag: it must start with the resolved
/// prefix and the remainder must match the version regex in full.
#[derive(Debug, Clone)]
pub struct TagValidator {
    regex: Regex,
    prefix: String,
}

impl TagValidator {
    pub fn new(version_regex: &str, prefix: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", version_regex)).map_err(|e| {
            ReleaseError::config(format!("Invalid tag pattern '{}': {}", version_regex, e))
        })?;

        Ok(TagValidator {
            regex,
            prefix: prefix.into(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_valid(&self, tag: &str) -> bool {
        self.version_of(tag).is_some()
    }

    /// The version embedded in `tag`, if the tag is valid
    pub fn version_of<'a>(&self, tag: &'a str) -> Option<&'a str> {
        tag.strip_prefix(self.prefix.as_str())
            .filter(|rest| self.regex.is_match(rest))
    }
}

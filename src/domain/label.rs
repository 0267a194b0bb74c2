//! Pre-release labels
//!
//! A version may carry a label such as `rc` or `beta`, optionally followed
//! directly by a counter (`rc2`, `beta10`). Callers request a label for the
//! next release with [`Label`], where the literal `"none"` means no label.

use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sentinel string meaning "no label requested"
pub const NO_LABEL: &str = "none";

/// The label requested for the next release
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Label {
    /// Release without a pre-release label
    #[default]
    None,
    /// Release with the given alphabetic label
    Named(String),
}

impl Label {
    /// Parse a requested label, accepting `"none"` as the empty request
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// The requested label name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Label::None => None,
            Label::Named(name) => Some(name.as_str()),
        }
    }
}

impl FromStr for Label {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == NO_LABEL {
            return Ok(Label::None);
        }

        if trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Label::Named(trimmed.to_string()))
        } else {
            Err(ReleaseError::validation(format!(
                "Invalid pre-release label '{}': only letters are allowed",
                s
            )))
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::None => write!(f, "{}", NO_LABEL),
            Label::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Pre-release part carried by an existing version, e.g. `rc` or `rc3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub name: String,
    pub counter: Option<u64>,
}

impl PreRelease {
    pub fn new(name: impl Into<String>, counter: Option<u64>) -> Self {
        PreRelease {
            name: name.into(),
            counter,
        }
    }

    /// The pre-release that follows this one under the same label.
    ///
    /// An unnumbered label jumps straight to 2: `rc` is the first candidate,
    /// `rc2` the second.
    pub fn next_iteration(&self) -> Self {
        let counter = match self.counter {
            Some(n) => n + 1,
            None => 2,
        };

        PreRelease {
            name: self.name.clone(),
            counter: Some(counter),
        }
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| match (self.counter, other.counter) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(&b),
            })
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(counter) = self.counter {
            write!(f, "{}", counter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_none_sentinel() {
        assert_eq!(Label::parse("none").unwrap(), Label::None);
        assert_eq!(Label::parse("").unwrap(), Label::None);
    }

    #[test]
    fn test_label_parse_named() {
        assert_eq!(Label::parse("rc").unwrap(), Label::Named("rc".to_string()));
        assert_eq!(Label::parse("beta").unwrap().name(), Some("beta"));
    }

    #[test]
    fn test_label_parse_invalid() {
        assert!(Label::parse("rc1").is_err());
        assert!(Label::parse("beta.1").is_err());
        assert!(Label::parse("pre-release").is_err());
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::None.to_string(), "none");
        assert_eq!(Label::Named("alpha".to_string()).to_string(), "alpha");
    }

    #[test]
    fn test_next_iteration_from_unnumbered() {
        let pr = PreRelease::new("rc", None);
        assert_eq!(pr.next_iteration(), PreRelease::new("rc", Some(2)));
    }

    #[test]
    fn test_next_iteration_from_numbered() {
        let pr = PreRelease::new("beta", Some(9));
        assert_eq!(pr.next_iteration(), PreRelease::new("beta", Some(10)));
    }

    #[test]
    fn test_prerelease_display() {
        assert_eq!(PreRelease::new("rc", Some(3)).to_string(), "rc3");
        assert_eq!(PreRelease::new("alpha", None).to_string(), "alpha");
    }

    #[test]
    fn test_prerelease_ordering() {
        assert!(PreRelease::new("alpha", Some(5)) < PreRelease::new("beta", None));
        assert!(PreRelease::new("rc", None) < PreRelease::new("rc", Some(1)));
        assert!(PreRelease::new("rc", Some(9)) < PreRelease::new("rc", Some(10)));
    }
}

use crate::domain::label::PreRelease;
use crate::domain::release_kind::ReleaseKind;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Pattern every semantic version handled by the engine must match.
///
/// Group 1 is the numeric core, group 2 the optional label counter.
pub const VALIDATION_PATTERN: &str = r"(\d+\.\d+\.\d+)(?:-[a-zA-Z]+(\d+)?)?";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-([a-zA-Z]+)(\d+)?)?$")
            .expect("version pattern is valid")
    })
}

/// Semantic version of the form `major.minor.patch[-label[counter]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<PreRelease>,
}

impl SemanticVersion {
    /// Create a new version without a pre-release label
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// Parse a version string, rejecting anything outside the canonical shape
    pub fn parse(version: &str) -> Result<Self> {
        let captures = version_regex().captures(version).ok_or_else(|| {
            ReleaseError::validation(format!(
                "Current version format is invalid ({}). It should be major.minor.patch",
                version
            ))
        })?;

        let number = |index: usize| -> Result<u64> {
            captures[index].parse::<u64>().map_err(|_| {
                ReleaseError::validation(format!(
                    "Version component '{}' in '{}' is out of range",
                    &captures[index], version
                ))
            })
        };

        let pre_release = match captures.get(4) {
            Some(name) => {
                let counter = match captures.get(5) {
                    Some(_) => Some(number(5)?),
                    None => None,
                };
                Some(PreRelease::new(name.as_str(), counter))
            }
            None => None,
        };

        Ok(SemanticVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre_release,
        })
    }

    /// Advance the numeric core, dropping any pre-release label
    pub fn bump(&self, kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Major => SemanticVersion::new(self.major + 1, 0, 0),
            ReleaseKind::Minor => SemanticVersion::new(self.major, self.minor + 1, 0),
            ReleaseKind::Patch => SemanticVersion::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// Same numeric core with the given pre-release (or none)
    pub fn with_pre_release(&self, pre_release: Option<PreRelease>) -> Self {
        SemanticVersion {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre_release,
        }
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre_release) = &self.pre_release {
            write!(f, "-{}", pre_release)?;
        }
        Ok(())
    }
}

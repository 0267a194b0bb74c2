use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which numeric component of a version a release advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    Major,
    Minor,
    #[default]
    Patch,
}

impl FromStr for ReleaseKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" | "m" => Ok(ReleaseKind::Major),
            "minor" | "i" => Ok(ReleaseKind::Minor),
            "patch" | "p" => Ok(ReleaseKind::Patch),
            _ => Err(ReleaseError::config(format!(
                "Unknown release type '{}' (expected major, minor or patch)",
                s
            ))),
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseKind::Major => write!(f, "major"),
            ReleaseKind::Minor => write!(f, "minor"),
            ReleaseKind::Patch => write!(f, "patch"),
        }
    }
}

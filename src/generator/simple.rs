use crate::domain::{Label, ReleaseKind};
use crate::error::{ReleaseError, Result};
use crate::generator::VersionGenerator;
use std::cmp::Ordering;

/// Versions are a single integer incremented on every release.
/// Release kind and label do not apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleGenerator;

impl SimpleGenerator {
    pub fn new() -> Self {
        SimpleGenerator
    }

    fn parse(version: &str) -> Result<u64> {
        version.trim().parse::<u64>().map_err(|_| {
            ReleaseError::validation(format!(
                "Current version format is invalid ({}). It should be numeric",
                version
            ))
        })
    }
}

impl VersionGenerator for SimpleGenerator {
    fn next_version(&self, current: &str, _kind: ReleaseKind, _label: &Label) -> Result<String> {
        Ok((SimpleGenerator::parse(current)? + 1).to_string())
    }

    fn validate(&self, version: &str) -> Result<()> {
        SimpleGenerator::parse(version).map(|_| ())
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering> {
        Ok(SimpleGenerator::parse(a)?.cmp(&SimpleGenerator::parse(b)?))
    }

    fn initial_version(&self) -> &'static str {
        "0"
    }

    fn validation_regex(&self) -> &'static str {
        r"\d+"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_increments() {
        let generator = SimpleGenerator::new();
        assert_eq!(
            generator
                .next_version("41", ReleaseKind::Major, &Label::None)
                .unwrap(),
            "42"
        );
        assert_eq!(
            generator
                .next_version(generator.initial_version(), ReleaseKind::Patch, &Label::None)
                .unwrap(),
            "1"
        );
    }

    #[test]
    fn test_next_version_rejects_non_numeric() {
        let generator = SimpleGenerator::new();
        assert!(generator
            .next_version("1.2.3", ReleaseKind::Patch, &Label::None)
            .is_err());
        assert!(generator.validate("1.2.3").is_err());
        assert!(generator.validate("12").is_ok());
    }

    #[test]
    fn test_compare_is_numeric() {
        let generator = SimpleGenerator::new();
        assert_eq!(generator.compare("9", "10").unwrap(), Ordering::Less);
        assert_eq!(generator.compare("10", "10").unwrap(), Ordering::Equal);
    }
}

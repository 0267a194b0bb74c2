use crate::domain::{Label, PreRelease, ReleaseKind, SemanticVersion, VALIDATION_PATTERN};
use crate::error::Result;
use crate::generator::VersionGenerator;
use std::cmp::Ordering;
use tracing::debug;

/// Semantic versioning (https://semver.org) with compact pre-release labels
/// such as `1.4.0-rc` or `1.4.0-rc3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticGenerator;

impl SemanticGenerator {
    pub fn new() -> Self {
        SemanticGenerator
    }

    /// Core state machine over parsed versions.
    ///
    /// A labelled version never advances its numbers: the label is either
    /// dropped (`none`), replaced (different label, no counter) or iterated
    /// (same label).
    pub fn next(current: &SemanticVersion, kind: ReleaseKind, label: &Label) -> SemanticVersion {
        match (&current.pre_release, label) {
            (Some(_), Label::None) => current.with_pre_release(None),
            (Some(existing), Label::Named(name)) if existing.name != *name => {
                current.with_pre_release(Some(PreRelease::new(name.as_str(), None)))
            }
            (Some(existing), Label::Named(_)) => {
                current.with_pre_release(Some(existing.next_iteration()))
            }
            (None, Label::None) => current.bump(kind),
            (None, Label::Named(name)) => current
                .bump(kind)
                .with_pre_release(Some(PreRelease::new(name.as_str(), None))),
        }
    }
}

impl VersionGenerator for SemanticGenerator {
    fn next_version(&self, current: &str, kind: ReleaseKind, label: &Label) -> Result<String> {
        let parsed = SemanticVersion::parse(current)?;
        let next = SemanticGenerator::next(&parsed, kind, label);

        debug!(current, next = %next, kind = %kind, label = %label, "Computed next version");
        Ok(next.to_string())
    }

    fn validate(&self, version: &str) -> Result<()> {
        SemanticVersion::parse(version).map(|_| ())
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering> {
        Ok(SemanticVersion::parse(a)?.cmp(&SemanticVersion::parse(b)?))
    }

    fn initial_version(&self) -> &'static str {
        "0.0.0"
    }

    fn validation_regex(&self) -> &'static str {
        VALIDATION_PATTERN
    }
}

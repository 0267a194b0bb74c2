//! Next-version computation
//!
//! A [`VersionGenerator`] knows one versioning scheme: how to validate a
//! version string, how to compute the version that follows it, and how to
//! order two versions. Persisters use the ordering to pick the latest release.
//!
//! - [`SemanticGenerator`]: `major.minor.patch[-label[n]]`
//! - [`SimpleGenerator`]: a single increasing integer

pub mod semantic;
pub mod simple;

pub use semantic::SemanticGenerator;
pub use simple::SimpleGenerator;

use crate::domain::{Label, ReleaseKind};
use crate::error::Result;
use std::cmp::Ordering;

/// A versioning scheme
pub trait VersionGenerator: Send + Sync {
    /// Compute the version following `current`.
    ///
    /// Fails with a validation error when `current` does not match
    /// [`validation_regex`](Self::validation_regex).
    fn next_version(&self, current: &str, kind: ReleaseKind, label: &Label) -> Result<String>;

    /// Check that `version` belongs to this scheme
    fn validate(&self, version: &str) -> Result<()>;

    /// Order two versions of this scheme (`Less` when `a` is older)
    fn compare(&self, a: &str, b: &str) -> Result<Ordering>;

    /// Version assumed when nothing has been released yet
    fn initial_version(&self) -> &'static str;

    /// Unanchored pattern matching every valid version of this scheme
    fn validation_regex(&self) -> &'static str;
}

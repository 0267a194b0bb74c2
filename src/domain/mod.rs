//! Domain logic - pure release rules independent of git and file access

pub mod label;
pub mod release_kind;
pub mod tag;
pub mod version;

pub use label::{Label, PreRelease, NO_LABEL};
pub use release_kind::ReleaseKind;
pub use tag::{TagPrefix, TagValidator};
pub use version::{SemanticVersion, VALIDATION_PATTERN};

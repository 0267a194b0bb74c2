//! Changelog file maintenance
//!
//! A changelog is read as a list of lines, handed to a dialect-specific
//! [ChangelogFormatter] that inserts the new release, and written back.
//! Formatters only ever insert lines; existing content keeps its order.

pub mod formatter;
pub mod manager;

pub use formatter::{
    AddTopFormatter, ChangelogFormatter, Dialect, MarkdownFormatter, PrefixGroupFormatter,
    PrefixGroupOptions, SemanticFormatter, SimpleFormatter,
};
pub use manager::ChangelogManager;

use crate::domain::ReleaseKind;

/// The arguments of one formatting call
#[derive(Debug, Clone, Copy)]
pub struct ReleaseEntry<'a> {
    pub version: &'a str,
    pub kind: Option<ReleaseKind>,
    pub comment: Option<&'a str>,
    pub extra_lines: &'a [String],
}

impl<'a> ReleaseEntry<'a> {
    pub fn new(version: &'a str) -> Self {
        ReleaseEntry {
            version,
            kind: None,
            comment: None,
            extra_lines: &[],
        }
    }

    pub fn with_kind(mut self, kind: ReleaseKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_comment(mut self, comment: &'a str) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn with_extra_lines(mut self, extra_lines: &'a [String]) -> Self {
        self.extra_lines = extra_lines;
        self
    }
}

/// User-supplied details of a release, independent of its version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub comment: Option<String>,
    pub kind: Option<ReleaseKind>,
    pub extra_lines: Vec<String>,
}

impl ReleaseNotes {
    /// Borrow these notes as the entry for `version`
    pub fn entry<'a>(&'a self, version: &'a str) -> ReleaseEntry<'a> {
        ReleaseEntry {
            version,
            kind: self.kind,
            comment: self.comment.as_deref(),
            extra_lines: &self.extra_lines,
        }
    }
}

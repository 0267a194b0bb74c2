//! Changelog dialects
//!
//! Each formatter knows how to insert a release into a document of its own
//! dialect and how to find the last released version in it again.

pub mod add_top;
pub mod prefix_group;
pub mod semantic;
pub mod simple;

pub use add_top::AddTopFormatter;
pub use prefix_group::{PrefixGroupFormatter, PrefixGroupOptions};
pub use semantic::{MarkdownFormatter, SemanticFormatter};
pub use simple::SimpleFormatter;

use crate::changelog::ReleaseEntry;
use crate::clock::Clock;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Date and time as rendered by the slash-dated dialects
pub(crate) const SLASH_TIMESTAMP: &str = "%d/%m/%Y %H:%M";

/// Insertion of a release into an existing document
pub trait ChangelogFormatter {
    /// Return `lines` with the release described by `entry` inserted
    ///
    /// # Arguments
    /// * `lines` - Current document, one element per line, no terminators
    /// * `entry` - Version, release kind, comment and detail lines
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - The document with the release inserted
    /// * `Err` - If the entry is incomplete for this dialect or the document
    ///   does not follow it
    fn update_existing_lines(&self, lines: Vec<String>, entry: &ReleaseEntry<'_>)
        -> Result<Vec<String>>;

    /// Pattern locating the most recent version; capture group 1 holds it
    fn last_version_regex(&self) -> &Regex;
}

/// Supported changelog dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    #[default]
    Simple,
    AddTop,
    Semantic,
    Markdown,
    PrefixGroup,
}

impl Dialect {
    /// Build the formatter for this dialect.
    ///
    /// `options` only matter to [Dialect::PrefixGroup].
    pub fn formatter(self, options: PrefixGroupOptions, clock: Clock) -> Box<dyn ChangelogFormatter> {
        match self {
            Dialect::Simple => Box::new(SimpleFormatter::new().with_clock(clock)),
            Dialect::AddTop => Box::new(AddTopFormatter::new()),
            Dialect::Semantic => Box::new(SemanticFormatter::new().with_clock(clock)),
            Dialect::Markdown => Box::new(MarkdownFormatter::new().with_clock(clock)),
            Dialect::PrefixGroup => Box::new(PrefixGroupFormatter::new(options).with_clock(clock)),
        }
    }
}

impl FromStr for Dialect {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Dialect::Simple),
            "add-top" | "addtop" => Ok(Dialect::AddTop),
            "semantic" => Ok(Dialect::Semantic),
            "markdown" => Ok(Dialect::Markdown),
            "prefix-group" | "prefixgroup" => Ok(Dialect::PrefixGroup),
            _ => Err(ReleaseError::config(format!(
                "Unknown changelog format '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Simple => "simple",
            Dialect::AddTop => "add-top",
            Dialect::Semantic => "semantic",
            Dialect::Markdown => "markdown",
            Dialect::PrefixGroup => "prefix-group",
        };
        write!(f, "{}", name)
    }
}

/// Compile a built-in pattern once
pub(crate) fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in changelog pattern is valid"))
}

/// Pattern capturing the whole first line, for dialects whose newest
/// release heading is always on top
pub(crate) fn first_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_regex(&RE, r"(.*)")
}

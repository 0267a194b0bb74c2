use crate::changelog::formatter::{cached_regex, ChangelogFormatter, SLASH_TIMESTAMP};
use crate::changelog::ReleaseEntry;
use crate::clock::{system_clock, Clock};
use crate::domain::ReleaseKind;
use crate::error::{ReleaseError, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const INITIAL_RELEASE: &str = "initial release";

/// Three heading levels, one per release kind:
///
/// ```text
///
/// VERSION 1  MAJOR TITLE
/// ======================
///
///    Version 1.1 - Minor Title
///       08/11/2024 12:34  1.1.1  patch comment
///          ada96f3 commit msg
///       08/11/2024 03:56  1.1.0  initial release
///
///    Version 1.0 - Minor Title
///       08/11/2024 03:56  1.0.0  initial release
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SemanticFormatter {
    clock: Clock,
}

/// The semantic layout rendered as nested Markdown lists:
///
/// ```text
///
/// ## VERSION 1  MAJOR TITLE
///
///  * Version **1.1** - Minor Title
///    * 2024-11-08 12:34  **1.1.1**  patch comment
///       * ada96f3 commit msg
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarkdownFormatter {
    clock: Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Markdown,
}

impl Style {
    fn name(self) -> &'static str {
        match self {
            Style::Plain => "semantic",
            Style::Markdown => "markdown",
        }
    }

    fn is_major_anchor(self, line: &str) -> bool {
        match self {
            Style::Plain => line.starts_with("======="),
            Style::Markdown => {
                static RE: OnceLock<Regex> = OnceLock::new();
                cached_regex(&RE, r"^##\s+").is_match(line)
            }
        }
    }

    fn is_minor_anchor(self, line: &str) -> bool {
        static PLAIN: OnceLock<Regex> = OnceLock::new();
        static MARKDOWN: OnceLock<Regex> = OnceLock::new();

        match self {
            Style::Plain => cached_regex(&PLAIN, r"Version\s\d+\.\d+\s-").is_match(line),
            Style::Markdown => {
                cached_regex(&MARKDOWN, r" \* Version\s\*\*\d+\.\d+\*\*\s-").is_match(line)
            }
        }
    }

    fn extra_line_prefix(self) -> &'static str {
        match self {
            Style::Plain => "         ",
            Style::Markdown => "      * ",
        }
    }

    fn last_version_regex(self) -> &'static Regex {
        static PLAIN: OnceLock<Regex> = OnceLock::new();
        static MARKDOWN: OnceLock<Regex> = OnceLock::new();

        match self {
            Style::Plain => cached_regex(&PLAIN, r"\s+\d+/\d+/\d+\s\d+:\d+\s+(\S+)"),
            Style::Markdown => cached_regex(
                &MARKDOWN,
                r"\d+-\d+-\d+\s\d+:\d+\s+\*\*([^\s*]+)\*\*",
            ),
        }
    }

    /// Index the heading block for `kind` is inserted at: the top for a
    /// major, otherwise right below the first heading one level up.
    fn insert_position(self, lines: &[String], kind: ReleaseKind) -> Result<usize> {
        let anchor = match kind {
            ReleaseKind::Major => return Ok(0),
            ReleaseKind::Minor => lines.iter().position(|l| self.is_major_anchor(l)),
            ReleaseKind::Patch => lines.iter().position(|l| self.is_minor_anchor(l)),
        };

        anchor.map(|pos| pos + 1).ok_or_else(|| {
            ReleaseError::format(format!(
                "no heading to insert a {} release under in this {} changelog",
                kind,
                self.name()
            ))
        })
    }

    /// Heading block for `kind`; a major opens its first minor, which in turn
    /// opens its first patch.
    fn new_lines(
        self,
        kind: ReleaseKind,
        version: &VersionParts<'_>,
        comment: &str,
        now: NaiveDateTime,
    ) -> Vec<String> {
        match kind {
            ReleaseKind::Major => {
                let title = format!("version {}  {}", version.major, comment).to_uppercase();
                let mut lines = match self {
                    Style::Plain => {
                        let underline = "=".repeat(title.chars().count());
                        vec![String::new(), title, underline]
                    }
                    Style::Markdown => vec![String::new(), format!("## {}", title)],
                };
                lines.extend(self.new_lines(ReleaseKind::Minor, version, comment, now));
                lines
            }
            ReleaseKind::Minor => {
                let heading = match self {
                    Style::Plain => format!(
                        "   Version {}.{} - {}",
                        version.major, version.minor, comment
                    ),
                    Style::Markdown => format!(
                        " * Version **{}.{}** - {}",
                        version.major, version.minor, comment
                    ),
                };
                let mut lines = vec![String::new(), heading];
                lines.extend(self.new_lines(ReleaseKind::Patch, version, INITIAL_RELEASE, now));
                lines
            }
            ReleaseKind::Patch => vec![match self {
                Style::Plain => format!(
                    "      {}  {}  {}",
                    now.format(SLASH_TIMESTAMP),
                    version.full,
                    comment
                ),
                Style::Markdown => format!(
                    "   * {}  **{}**  {}",
                    now.format("%Y-%m-%d %H:%M"),
                    version.full,
                    comment
                ),
            }],
        }
    }

    fn update(
        self,
        mut lines: Vec<String>,
        entry: &ReleaseEntry<'_>,
        now: NaiveDateTime,
    ) -> Result<Vec<String>> {
        let requested = entry.kind.ok_or_else(|| {
            ReleaseError::validation(format!(
                "a release type is mandatory for the {} changelog format",
                self.name()
            ))
        })?;

        // A new document always starts with a major heading
        let kind = if lines.is_empty() {
            ReleaseKind::Major
        } else {
            requested
        };

        let version = VersionParts::split(entry.version)?;
        let position = self.insert_position(&lines, kind)?;
        debug!(position, kind = %kind, "Inserting {} release heading", self.name());

        let block = self.new_lines(kind, &version, entry.comment.unwrap_or_default(), now);
        lines.splice(position..position, block);

        if !entry.extra_lines.is_empty() {
            let position = self.insert_position(&lines, ReleaseKind::Patch)? + 1;
            let prefix = self.extra_line_prefix();
            lines.splice(
                position..position,
                entry
                    .extra_lines
                    .iter()
                    .map(|line| format!("{}{}", prefix, line)),
            );
        }

        Ok(lines)
    }
}

struct VersionParts<'a> {
    full: &'a str,
    major: &'a str,
    minor: &'a str,
}

impl<'a> VersionParts<'a> {
    fn split(version: &'a str) -> Result<Self> {
        let mut parts = version.split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().ok_or_else(|| {
            ReleaseError::validation(format!(
                "{} has no minor component to file it under",
                version
            ))
        })?;

        Ok(VersionParts {
            full: version,
            major,
            minor,
        })
    }
}

impl SemanticFormatter {
    pub fn new() -> Self {
        SemanticFormatter {
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for SemanticFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogFormatter for SemanticFormatter {
    fn update_existing_lines(
        &self,
        lines: Vec<String>,
        entry: &ReleaseEntry<'_>,
    ) -> Result<Vec<String>> {
        Style::Plain.update(lines, entry, (self.clock)())
    }

    fn last_version_regex(&self) -> &Regex {
        Style::Plain.last_version_regex()
    }
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        MarkdownFormatter {
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    fn update_existing_lines(
        &self,
        lines: Vec<String>,
        entry: &ReleaseEntry<'_>,
    ) -> Result<Vec<String>> {
        Style::Markdown.update(lines, entry, (self.clock)())
    }

    fn last_version_regex(&self) -> &Regex {
        Style::Markdown.last_version_regex()
    }
}

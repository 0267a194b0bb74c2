use crate::changelog::formatter::{cached_regex, ChangelogFormatter, SLASH_TIMESTAMP};
use crate::changelog::ReleaseEntry;
use crate::clock::{system_clock, Clock};
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

/// One line per release, newest first:
///
/// ```text
/// 08/11/2024 12:34  1.2.0  comment
/// abc1234 detail line
/// 01/10/2024 09:00  1.1.0  older comment
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleFormatter {
    clock: Clock,
}

impl SimpleFormatter {
    pub fn new() -> Self {
        SimpleFormatter {
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogFormatter for SimpleFormatter {
    fn update_existing_lines(
        &self,
        mut lines: Vec<String>,
        entry: &ReleaseEntry<'_>,
    ) -> Result<Vec<String>> {
        let release = format!(
            "{}  {}  {}",
            (self.clock)().format(SLASH_TIMESTAMP),
            entry.version,
            entry.comment.unwrap_or_default()
        );

        lines.insert(0, release);
        lines.splice(1..1, entry.extra_lines.iter().cloned());

        Ok(lines)
    }

    fn last_version_regex(&self) -> &Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        cached_regex(&RE, r"\d+/\d+/\d+\s\d+:\d+\s\s(\S+)")
    }
}

use crate::changelog::formatter::{first_line_regex, ChangelogFormatter};
use crate::changelog::ReleaseEntry;
use crate::error::Result;
use regex::Regex;

/// Puts an underlined version heading above the entries that were written
/// by hand since the last release:
///
/// ```text
/// 1.1.0
/// -----
///
/// * **2024-11-01**: an entry written before the release
/// ```
///
/// The comment itself is never rendered. Without a comment, two blank lines
/// separate the new heading block from the previous content.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddTopFormatter;

impl AddTopFormatter {
    pub fn new() -> Self {
        AddTopFormatter
    }
}

impl ChangelogFormatter for AddTopFormatter {
    fn update_existing_lines(
        &self,
        lines: Vec<String>,
        entry: &ReleaseEntry<'_>,
    ) -> Result<Vec<String>> {
        let mut updated = Vec::with_capacity(lines.len() + entry.extra_lines.len() + 5);

        updated.push(entry.version.to_string());
        updated.push("-".repeat(entry.version.chars().count()));
        updated.push(String::new());
        updated.extend(entry.extra_lines.iter().cloned());

        if entry.comment.is_none() {
            updated.push(String::new());
            updated.push(String::new());
        }

        updated.extend(lines);
        Ok(updated)
    }

    fn last_version_regex(&self) -> &Regex {
        first_line_regex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<String> {
        vec!["1.0.0".to_string(), "-----".to_string()]
    }

    #[test]
    fn test_heading_without_comment() {
        let lines = AddTopFormatter::new()
            .update_existing_lines(existing(), &ReleaseEntry::new("1.1.0"))
            .unwrap();

        assert_eq!(lines, vec!["1.1.0", "-----", "", "", "", "1.0.0", "-----"]);
    }

    #[test]
    fn test_heading_with_comment_and_extra_lines() {
        let extra = vec!["* new parser".to_string()];
        let entry = ReleaseEntry::new("1.10.0")
            .with_comment("ignored")
            .with_extra_lines(&extra);

        let lines = AddTopFormatter::new()
            .update_existing_lines(existing(), &entry)
            .unwrap();

        assert_eq!(
            lines,
            vec!["1.10.0", "------", "", "* new parser", "1.0.0", "-----"]
        );
    }

    #[test]
    fn test_regex_captures_first_line() {
        let formatter = AddTopFormatter::new();
        let lines = formatter
            .update_existing_lines(existing(), &ReleaseEntry::new("2.0.0"))
            .unwrap();
        let content = lines.join("\n");

        let captures = formatter.last_version_regex().captures(&content).unwrap();
        assert_eq!(&captures[1], "2.0.0");
    }
}

use crate::changelog::formatter::{
    cached_regex, first_line_regex, ChangelogFormatter, SLASH_TIMESTAMP,
};
use crate::changelog::ReleaseEntry;
use crate::clock::{system_clock, Clock};
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Category used when a detail line names none
pub const DEFAULT_GROUP: &str = "CHANGED";

/// Grouping rules for [PrefixGroupFormatter]
///
/// Category names are stored upper-cased. Declared groups are rendered in
/// declaration order, before any group first seen in the detail lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGroupOptions {
    default_group: String,
    groups: Vec<String>,
    ignore_groups: Vec<String>,
}

impl PrefixGroupOptions {
    /// Validate and normalize grouping rules
    ///
    /// # Returns
    /// * `Err(ReleaseError::Config)` - If a category name is empty or
    ///   contains brackets, which the detail line grammar cannot express
    pub fn new<S: AsRef<str>>(
        default_group: Option<&str>,
        groups: &[S],
        ignore_groups: &[S],
    ) -> Result<Self> {
        let default_group = match default_group {
            Some(name) => normalize_category(name)?,
            None => DEFAULT_GROUP.to_string(),
        };

        let groups = groups
            .iter()
            .map(|g| normalize_category(g.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let ignore_groups = ignore_groups
            .iter()
            .map(|g| normalize_category(g.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(PrefixGroupOptions {
            default_group,
            groups,
            ignore_groups,
        })
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn ignore_groups(&self) -> &[String] {
        &self.ignore_groups
    }

    fn is_ignored(&self, category: &str) -> bool {
        self.ignore_groups.iter().any(|g| g == category)
    }
}

impl Default for PrefixGroupOptions {
    fn default() -> Self {
        PrefixGroupOptions {
            default_group: DEFAULT_GROUP.to_string(),
            groups: Vec::new(),
            ignore_groups: Vec::new(),
        }
    }
}

fn normalize_category(name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ReleaseError::config("Changelog group names cannot be empty"));
    }

    if trimmed.contains('[') || trimmed.contains(']') {
        return Err(ReleaseError::config(format!(
            "Changelog group name '{}' cannot contain brackets",
            trimmed
        )));
    }

    Ok(trimmed.to_uppercase())
}

/// "Keep a changelog" layout, detail lines grouped by category:
///
/// ```text
/// ## [1.1.0] - 05/03/2024 10:00 comment
///
/// ### ADDED
///
/// - [ada96f3] commit msg
///
/// ## [1.0.0] - 20/06/2023 09:00
/// ```
///
/// Detail lines are read as `<hex-id> [<category>] <text>`, the category
/// being optional.
#[derive(Debug, Clone)]
pub struct PrefixGroupFormatter {
    options: PrefixGroupOptions,
    clock: Clock,
}

impl PrefixGroupFormatter {
    pub fn new(options: PrefixGroupOptions) -> Self {
        PrefixGroupFormatter {
            options,
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &PrefixGroupOptions {
        &self.options
    }

    fn release_position(lines: &[String]) -> usize {
        static RE: OnceLock<Regex> = OnceLock::new();
        let heading = cached_regex(&RE, r"## \[\d+\.\d+\.\d+\]\s-");

        lines
            .iter()
            .position(|line| heading.is_match(line))
            .unwrap_or(0)
    }

    /// Sort detail lines into their categories and render one block per
    /// non-empty, non-ignored category
    fn grouped_lines(&self, extra_lines: &[String]) -> Vec<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let grammar = cached_regex(&RE, r"^([0-9A-Fa-f]+) (?:\[([^\]]*)\] )?(.*)");

        let mut groups: Vec<(String, Vec<String>)> = self
            .options
            .groups
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        for line in extra_lines {
            if line.trim().is_empty() {
                continue;
            }

            let (category, rendered) = match grammar.captures(line) {
                Some(captures) => {
                    let category = captures
                        .get(2)
                        .map(|m| m.as_str().trim())
                        .filter(|name| !name.is_empty())
                        .map(str::to_uppercase)
                        .unwrap_or_else(|| self.options.default_group.clone());
                    (category, format!("- [{}] {}", &captures[1], &captures[3]))
                }
                None => (self.options.default_group.clone(), format!("- {}", line)),
            };

            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, entries)) => entries.push(rendered),
                None => groups.push((category, vec![rendered])),
            }
        }

        let mut rendered = Vec::new();

        for (name, entries) in groups {
            if entries.is_empty() || self.options.is_ignored(&name) {
                continue;
            }

            rendered.push(format!("### {}", name));
            rendered.push(String::new());
            rendered.extend(entries);
            rendered.push(String::new());
        }

        rendered
    }
}

impl Default for PrefixGroupFormatter {
    fn default() -> Self {
        Self::new(PrefixGroupOptions::default())
    }
}

impl ChangelogFormatter for PrefixGroupFormatter {
    fn update_existing_lines(
        &self,
        mut lines: Vec<String>,
        entry: &ReleaseEntry<'_>,
    ) -> Result<Vec<String>> {
        let position = PrefixGroupFormatter::release_position(&lines);
        debug!(position, "Inserting release section");

        let heading = format!(
            "## [{}] - {} {}",
            entry.version,
            (self.clock)().format(SLASH_TIMESTAMP),
            entry.comment.unwrap_or_default()
        );

        let mut block = vec![heading.trim().to_string(), String::new()];
        block.extend(self.grouped_lines(entry.extra_lines));

        lines.splice(position..position, block);
        Ok(lines)
    }

    fn last_version_regex(&self) -> &Regex {
        first_line_regex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn formatter(options: PrefixGroupOptions) -> PrefixGroupFormatter {
        PrefixGroupFormatter::new(options).with_clock(fixed_clock)
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_declared_groups_come_first() {
        let options = PrefixGroupOptions::new(None, &["Added", "Fixed"], &[]).unwrap();
        let extra = lines(&[
            "ada96f3 [fixed] crash on empty input",
            "2eb6fae [Removed] legacy flag",
            "b1c2d3e [added] markdown output",
        ]);
        let entry = ReleaseEntry::new("1.1.0").with_extra_lines(&extra);

        let result = formatter(options)
            .update_existing_lines(Vec::new(), &entry)
            .unwrap();

        assert_eq!(
            result,
            vec![
                "## [1.1.0] - 05/03/2024 10:00",
                "",
                "### ADDED",
                "",
                "- [b1c2d3e] markdown output",
                "",
                "### FIXED",
                "",
                "- [ada96f3] crash on empty input",
                "",
                "### REMOVED",
                "",
                "- [2eb6fae] legacy flag",
                "",
            ]
        );
    }

    #[test]
    fn test_undeclared_groups_in_first_seen_order() {
        let extra = lines(&[
            "1111111 [zeta] one",
            "2222222 [alpha] two",
            "3333333 [zeta] three",
        ]);
        let entry = ReleaseEntry::new("2.0.0").with_extra_lines(&extra);

        let result = formatter(PrefixGroupOptions::default())
            .update_existing_lines(Vec::new(), &entry)
            .unwrap();

        let headings: Vec<&String> = result.iter().filter(|l| l.starts_with("###")).collect();
        assert_eq!(headings, vec!["### ZETA", "### ALPHA"]);
        assert_eq!(result[4], "- [1111111] one");
        assert_eq!(result[5], "- [3333333] three");
    }

    #[test]
    fn test_default_and_ignored_groups() {
        let options = PrefixGroupOptions::new(Some("Misc"), &[], &["doc"]).unwrap();
        let extra = lines(&[
            "abc1234 plain change",
            "",
            "def5678 [DOC] readme",
            "bad1dea [] empty category",
            "not a commit line",
        ]);
        let entry = ReleaseEntry::new("1.0.1")
            .with_comment("maintenance")
            .with_extra_lines(&extra);

        let result = formatter(options)
            .update_existing_lines(Vec::new(), &entry)
            .unwrap();

        assert_eq!(
            result,
            vec![
                "## [1.0.1] - 05/03/2024 10:00 maintenance",
                "",
                "### MISC",
                "",
                "- [abc1234] plain change",
                "- [bad1dea] empty category",
                "- not a commit line",
                "",
            ]
        );
    }

    #[test]
    fn test_inserted_above_previous_release() {
        let existing = lines(&[
            "# Changelog",
            "",
            "## [1.0.0] - 20/06/2023 09:00",
            "",
            "### ADDED",
        ]);
        let entry = ReleaseEntry::new("1.1.0").with_comment("next");

        let result = formatter(PrefixGroupOptions::default())
            .update_existing_lines(existing, &entry)
            .unwrap();

        assert_eq!(
            result,
            vec![
                "# Changelog",
                "",
                "## [1.1.0] - 05/03/2024 10:00 next",
                "",
                "## [1.0.0] - 20/06/2023 09:00",
                "",
                "### ADDED",
            ]
        );
    }

    #[test]
    fn test_options_reject_invalid_names() {
        assert!(matches!(
            PrefixGroupOptions::new(Some(" "), &[] as &[&str], &[]),
            Err(ReleaseError::Config(_))
        ));
        assert!(matches!(
            PrefixGroupOptions::new(None, &["[Added]"], &[]),
            Err(ReleaseError::Config(_))
        ));
    }

    #[test]
    fn test_options_are_uppercased() {
        let options = PrefixGroupOptions::new(Some("changed"), &["Added"], &["chore"]).unwrap();
        assert_eq!(options.default_group(), "CHANGED");
        assert_eq!(options.groups(), &["ADDED".to_string()]);
        assert_eq!(options.ignore_groups(), &["CHORE".to_string()]);
    }
}

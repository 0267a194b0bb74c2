use crate::changelog::ReleaseNotes;
use crate::clock::{system_clock, Clock};
use crate::domain::{TagPrefix, TagValidator};
use crate::error::{ReleaseError, Result};
use crate::generator::VersionGenerator;
use crate::persister::VersionPersister;
use crate::vcs::VersionControl;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Records each release as a VCS tag named `<prefix><version>`
pub struct TagPersister {
    generator: Arc<dyn VersionGenerator>,
    prefix: TagPrefix,
    tag_pattern: String,
    clock: Clock,
}

impl TagPersister {
    /// Create a tag persister
    ///
    /// # Arguments
    /// * `generator` - Orders the versions found in tags
    /// * `prefix` - Tag prefix template
    /// * `tag_pattern` - Version pattern; the generator's own when `None`
    pub fn new(
        generator: Arc<dyn VersionGenerator>,
        prefix: TagPrefix,
        tag_pattern: Option<String>,
    ) -> Result<Self> {
        let tag_pattern =
            tag_pattern.unwrap_or_else(|| generator.validation_regex().to_string());

        // Fails on a bad pattern
        TagValidator::new(&tag_pattern, prefix.template())?;

        Ok(TagPersister {
            generator,
            prefix,
            tag_pattern,
            clock: system_clock,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The prefix with its placeholders substituted
    pub fn resolved_prefix(&self, vcs: &dyn VersionControl) -> Result<String> {
        self.prefix
            .resolve(|| vcs.current_branch(), (self.clock)().date())
    }

    /// Tags accepted as releases, stripped down to their versions
    fn release_versions(&self, vcs: &dyn VersionControl) -> Result<Vec<String>> {
        let validator = TagValidator::new(&self.tag_pattern, self.resolved_prefix(vcs)?)?;
        let tags = vcs.tags()?;

        let versions: Vec<String> = tags
            .iter()
            .filter_map(|tag| validator.version_of(tag))
            .filter(|version| match self.generator.validate(version) {
                Ok(()) => true,
                Err(e) => {
                    warn!(version = *version, "Skipping release tag: {}", e);
                    false
                }
            })
            .map(String::from)
            .collect();

        debug!(
            total = tags.len(),
            matching = versions.len(),
            prefix = validator.prefix(),
            "Filtered release tags"
        );

        Ok(versions)
    }
}

impl VersionPersister for TagPersister {
    fn current_version(&self, vcs: &dyn VersionControl) -> Result<String> {
        let versions = self.release_versions(vcs)?;

        if versions.is_empty() {
            return Err(ReleaseError::no_release(
                "No VCS tag matching the tag pattern",
            ));
        }

        let mut current: Option<String> = None;

        for version in versions {
            let newer = match &current {
                None => true,
                // Later tags win ties
                Some(best) => self.generator.compare(&version, best)? != Ordering::Less,
            };

            if newer {
                current = Some(version);
            }
        }

        current.ok_or_else(|| ReleaseError::no_release("No VCS tag matching the tag pattern"))
    }

    fn save(&self, version: &str, vcs: &dyn VersionControl, _notes: &ReleaseNotes) -> Result<String> {
        let tag = self.tag_from_version(version, vcs)?;
        vcs.create_tag(&tag)?;

        info!(tag = %tag, "Created release tag");
        Ok(tag)
    }

    fn tag_from_version(&self, version: &str, vcs: &dyn VersionControl) -> Result<String> {
        Ok(TagPrefix::format(&self.resolved_prefix(vcs)?, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{SemanticGenerator, SimpleGenerator};
    use crate::vcs::MockVersionControl;
    use chrono::{NaiveDate, NaiveDateTime};

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn persister(prefix: &str) -> TagPersister {
        TagPersister::new(
            Arc::new(SemanticGenerator::new()),
            TagPrefix::new(prefix).unwrap(),
            None,
        )
        .unwrap()
        .with_clock(fixed_clock)
    }

    fn vcs_with_tags(tags: &[&str]) -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        for tag in tags {
            vcs.add_tag(*tag);
        }
        vcs
    }

    #[test]
    fn test_current_version_is_highest_tag() {
        let vcs = vcs_with_tags(&["v1.0.0", "v1.2.0", "v1.1.5"]);
        assert_eq!(persister("v").current_version(&vcs).unwrap(), "1.2.0");
    }

    #[test]
    fn test_current_version_ignores_foreign_tags() {
        let vcs = vcs_with_tags(&["v1.0.0", "release-9.0.0", "v2.0", "vnext", "v1.0.1-rc2"]);
        assert_eq!(persister("v").current_version(&vcs).unwrap(), "1.0.1-rc2");
    }

    #[test]
    fn test_unparsable_version_is_skipped() {
        let vcs = vcs_with_tags(&["v1.0.0", "v1.2.0", "v99999999999999999999.0.0"]);
        assert_eq!(persister("v").current_version(&vcs).unwrap(), "1.2.0");
    }

    #[test]
    fn test_loose_pattern_skips_foreign_versions() {
        let vcs = vcs_with_tags(&["v1.0.0", "v2.0"]);
        let persister = TagPersister::new(
            Arc::new(SemanticGenerator::new()),
            TagPrefix::new("v").unwrap(),
            Some(r"[\d.]+".to_string()),
        )
        .unwrap();

        assert_eq!(persister.current_version(&vcs).unwrap(), "1.0.0");
    }

    #[test]
    fn test_no_matching_tag() {
        let vcs = vcs_with_tags(&["1.0.0", "latest"]);
        let err = persister("v").current_version(&vcs).unwrap_err();
        assert!(err.is_no_release_found());
    }

    #[test]
    fn test_save_creates_prefixed_tag() {
        let vcs = MockVersionControl::new();
        let tag = persister("v")
            .save("1.3.0", &vcs, &ReleaseNotes::default())
            .unwrap();

        assert_eq!(tag, "v1.3.0");
        assert_eq!(vcs.created_tags(), vec!["v1.3.0"]);
    }

    #[test]
    fn test_placeholders_resolve_from_branch_and_clock() {
        let mut vcs = vcs_with_tags(&["develop_2024-03-09_1.0.0", "main_2024-03-09_2.0.0"]);
        vcs.set_branch(Some("develop"));

        let persister = persister("{branch-name}_{date}_");
        assert_eq!(persister.current_version(&vcs).unwrap(), "1.0.0");
        assert_eq!(
            persister.tag_from_version("1.0.1", &vcs).unwrap(),
            "develop_2024-03-09_1.0.1"
        );
        assert_eq!(
            persister.current_version_tag(&vcs).unwrap(),
            "develop_2024-03-09_1.0.0"
        );
    }

    #[test]
    fn test_branch_placeholder_on_detached_head() {
        let mut vcs = MockVersionControl::new();
        vcs.set_branch(None);

        let err = persister("{branch-name}-").current_version(&vcs).unwrap_err();
        assert!(matches!(err, ReleaseError::Vcs(_)));
    }

    #[test]
    fn test_custom_pattern_and_simple_generator() {
        let vcs = vcs_with_tags(&["build-9", "build-10", "build-x"]);
        let persister = TagPersister::new(
            Arc::new(SimpleGenerator::new()),
            TagPrefix::new("build-").unwrap(),
            Some(r"\d+".to_string()),
        )
        .unwrap();

        assert_eq!(persister.current_version(&vcs).unwrap(), "10");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let result = TagPersister::new(
            Arc::new(SemanticGenerator::new()),
            TagPrefix::new("v").unwrap(),
            Some("(".to_string()),
        );
        assert!(matches!(result, Err(ReleaseError::Config(_))));
    }
}

//! Release workflow orchestration
//!
//! Sequences the collaborators of a release: resolve the current version,
//! compute the next one, update the changelog, then persist. Each step
//! records its result in a [ReleaseContext]; a step that needs a value an
//! earlier step did not produce fails with an ordering error. The workflow
//! can be driven programmatically without depending on clap.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::changelog::{ChangelogManager, ReleaseNotes};
use crate::config::{Config, GeneratorConfig};
use crate::domain::{Label, ReleaseKind};
use crate::error::{ReleaseError, Result};
use crate::generator::VersionGenerator;
use crate::persister::VersionPersister;
use crate::vcs::VersionControl;

/// What the user asked to release
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseRequest {
    pub kind: ReleaseKind,
    pub label: Label,
    pub comment: Option<String>,
}

impl ReleaseRequest {
    /// Combine command line choices with configured defaults
    ///
    /// A release kind or label given on the command line wins over the
    /// configured one. Labels are refused unless `allow_label` is set.
    pub fn resolve(
        config: &GeneratorConfig,
        kind: Option<ReleaseKind>,
        label: Option<&str>,
        comment: Option<String>,
    ) -> Result<Self> {
        let kind = kind.or(config.release_kind).unwrap_or_default();

        let label = match label {
            Some(requested) => {
                let label = Label::parse(requested)?;
                if label != Label::None && !config.allow_label {
                    return Err(ReleaseError::config(format!(
                        "Label '{}' requested but labels are disabled (generator.allow_label)",
                        requested
                    )));
                }
                label
            }
            None if config.allow_label => match &config.label {
                Some(configured) => Label::parse(configured)?,
                None => Label::None,
            },
            None => Label::None,
        };

        Ok(ReleaseRequest {
            kind,
            label,
            comment: comment.filter(|c| !c.trim().is_empty()),
        })
    }

    fn notes(&self) -> ReleaseNotes {
        ReleaseNotes {
            comment: self.comment.clone(),
            kind: Some(self.kind),
            extra_lines: Vec::new(),
        }
    }
}

/// Values produced by the workflow steps so far
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseContext {
    pub current_version: Option<String>,
    pub next_version: Option<String>,
    /// No release existed; `current_version` is the generator's initial one
    pub first_release: bool,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Version released before, `None` on a first release
    pub previous_version: Option<String>,

    /// The version that was released
    pub version: String,

    /// The tag that was created, `None` in dry-run mode
    pub tag: Option<String>,

    /// Whether the changelog file was rewritten
    pub changelog_updated: bool,

    /// Whether the tag was pushed to a remote
    pub published: bool,
}

/// Changelog update performed before persisting
pub struct ChangelogStep {
    manager: ChangelogManager,
    dump_commits: bool,
    exclude_merge_commits: bool,
}

impl ChangelogStep {
    pub fn new(manager: ChangelogManager, dump_commits: bool, exclude_merge_commits: bool) -> Self {
        ChangelogStep {
            manager,
            dump_commits,
            exclude_merge_commits,
        }
    }
}

/// The release engine's collaborators and the state of one run
pub struct ReleaseWorkflow {
    generator: Arc<dyn VersionGenerator>,
    persister: Box<dyn VersionPersister>,
    vcs: Box<dyn VersionControl>,
    changelog: Option<ChangelogStep>,
    publish_remote: Option<String>,
    dry_run: bool,
    context: ReleaseContext,
}

impl ReleaseWorkflow {
    pub fn new(
        generator: Arc<dyn VersionGenerator>,
        persister: Box<dyn VersionPersister>,
        vcs: Box<dyn VersionControl>,
    ) -> Self {
        ReleaseWorkflow {
            generator,
            persister,
            vcs,
            changelog: None,
            publish_remote: None,
            dry_run: false,
            context: ReleaseContext::default(),
        }
    }

    /// Build every collaborator from a validated configuration
    ///
    /// # Arguments
    /// * `config` - Loaded configuration
    /// * `root` - Project root; repository and changelog paths are relative to it
    /// * `dry_run` - Compute versions without writing anything
    pub fn from_config(config: &Config, root: &Path, dry_run: bool) -> Result<Self> {
        let mut workflow = ReleaseWorkflow::inspect(config, root)?.with_dry_run(dry_run);

        if let Some(manager) = config.changelog_manager(root)? {
            workflow = workflow.with_changelog(ChangelogStep::new(
                manager,
                config.changelog.dump_commits,
                config.changelog.exclude_merge_commits,
            ));
        }

        if config.vcs.publish {
            workflow = workflow.with_publish(config.vcs.remote.clone());
        }

        Ok(workflow)
    }

    /// Build the collaborators needed to look at releases, leaving out the
    /// changelog step and publishing
    pub fn inspect(config: &Config, root: &Path) -> Result<Self> {
        let generator = config.generator();
        let vcs = config.version_control(root)?;
        let persister = config.persister(root, Arc::clone(&generator))?;

        Ok(ReleaseWorkflow::new(generator, persister, vcs))
    }

    pub fn with_changelog(mut self, step: ChangelogStep) -> Self {
        self.changelog = Some(step);
        self
    }

    /// Push created tags to `remote`
    pub fn with_publish(mut self, remote: impl Into<String>) -> Self {
        self.publish_remote = Some(remote.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn context(&self) -> &ReleaseContext {
        &self.context
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Look up the current version; without any release, start from the
    /// generator's initial version
    pub fn resolve_current_version(&mut self) -> Result<String> {
        let (version, first_release) = match self.persister.current_version(self.vcs.as_ref()) {
            Ok(version) => (version, false),
            Err(e) if e.is_no_release_found() => {
                warn!(
                    initial = self.generator.initial_version(),
                    "No previous release found ({}), this is the first release", e
                );
                (self.generator.initial_version().to_string(), true)
            }
            Err(e) => return Err(e),
        };

        debug!(current = %version, first_release, "Resolved current version");
        self.context.current_version = Some(version.clone());
        self.context.first_release = first_release;
        Ok(version)
    }

    /// The released version, without falling back to an initial one
    pub fn released_version(&self) -> Result<String> {
        self.persister.current_version(self.vcs.as_ref())
    }

    /// The tag of the current release
    pub fn current_version_tag(&self) -> Result<String> {
        self.persister.current_version_tag(self.vcs.as_ref())
    }

    /// The tag `version` is recorded under
    pub fn tag_from_version(&self, version: &str) -> Result<String> {
        self.persister.tag_from_version(version, self.vcs.as_ref())
    }

    /// Compute the next version from the resolved current one
    pub fn compute_next_version(&mut self, kind: ReleaseKind, label: &Label) -> Result<String> {
        let current = self
            .context
            .current_version
            .as_deref()
            .ok_or_else(|| ReleaseError::ordering("current version"))?;

        let next = self.generator.next_version(current, kind, label)?;

        self.context.next_version = Some(next.clone());
        Ok(next)
    }

    /// The current release tag and the commits made since
    ///
    /// # Returns
    /// * `Err(ReleaseError::NoReleaseFound)` - If nothing was released yet
    pub fn last_changes(&self, exclude_merge_commits: bool) -> Result<(String, Vec<String>)> {
        let tag = self.current_version_tag()?;
        let changes = self
            .vcs
            .modifications_since(&tag, exclude_merge_commits)?;

        Ok((tag, changes))
    }

    /// Insert the next version into the changelog, when one is configured
    ///
    /// # Returns
    /// * `Ok(true)` - The changelog file was rewritten
    /// * `Ok(false)` - No changelog is configured, or dry-run mode
    pub fn update_changelog(&mut self, notes: &ReleaseNotes) -> Result<bool> {
        let next = self
            .context
            .next_version
            .clone()
            .ok_or_else(|| ReleaseError::ordering("next version"))?;

        let Some(step) = &self.changelog else {
            return Ok(false);
        };

        let mut extra_lines = notes.extra_lines.clone();

        if step.dump_commits {
            if self.context.first_release {
                // No previous tag to list commits from, the entry is still written
                warn!("No commits dumped as this is the first release");
            } else {
                let current = self
                    .context
                    .current_version
                    .as_deref()
                    .ok_or_else(|| ReleaseError::ordering("current version"))?;
                let tag = self.persister.tag_from_version(current, self.vcs.as_ref())?;
                extra_lines.extend(
                    self.vcs
                        .modifications_since(&tag, step.exclude_merge_commits)?,
                );
            }
        }

        if self.dry_run {
            warn!(
                path = %step.manager.path().display(),
                "Dry run, skipping changelog update"
            );
            return Ok(false);
        }

        let notes = ReleaseNotes {
            extra_lines,
            ..notes.clone()
        };
        step.manager.update(&notes.entry(&next))?;

        Ok(true)
    }

    /// Record the next version as released and publish its tag if configured
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The created tag
    /// * `Ok(None)` - Dry-run mode, nothing was written
    pub fn persist(&mut self, notes: &ReleaseNotes) -> Result<Option<String>> {
        let next = self
            .context
            .next_version
            .clone()
            .ok_or_else(|| ReleaseError::ordering("next version"))?;

        if self.dry_run {
            let tag = self.persister.tag_from_version(&next, self.vcs.as_ref())?;
            warn!(tag = %tag, "Dry run, release not persisted");
            return Ok(None);
        }

        let tag = self.persister.save(&next, self.vcs.as_ref(), notes)?;
        info!(version = %next, tag = %tag, "Release persisted");

        if let Some(remote) = &self.publish_remote {
            self.vcs.publish_tag(&tag, remote)?;
            info!(tag = %tag, remote = %remote, "Tag published");
        }

        Ok(Some(tag))
    }

    /// Run the complete release
    pub fn run(&mut self, request: &ReleaseRequest) -> Result<ReleaseOutcome> {
        self.resolve_current_version()?;
        let version = self.compute_next_version(request.kind, &request.label)?;

        let notes = request.notes();
        let changelog_updated = self.update_changelog(&notes)?;
        let tag = self.persist(&notes)?;

        let previous_version = if self.context.first_release {
            None
        } else {
            self.context.current_version.clone()
        };

        Ok(ReleaseOutcome {
            previous_version,
            version,
            published: tag.is_some() && self.publish_remote.is_some(),
            tag,
            changelog_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::SimpleFormatter;
    use crate::domain::TagPrefix;
    use crate::generator::SemanticGenerator;
    use crate::persister::TagPersister;
    use crate::vcs::MockVersionControl;

    fn workflow(vcs: MockVersionControl) -> ReleaseWorkflow {
        let generator: Arc<dyn VersionGenerator> = Arc::new(SemanticGenerator::new());
        let persister = TagPersister::new(
            Arc::clone(&generator),
            TagPrefix::new("v").unwrap(),
            None,
        )
        .unwrap();

        ReleaseWorkflow::new(generator, Box::new(persister), Box::new(vcs))
    }

    #[test]
    fn test_next_version_before_current_is_ordering_error() {
        let mut workflow = workflow(MockVersionControl::new());
        let err = workflow
            .compute_next_version(ReleaseKind::Patch, &Label::None)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Ordering(_)));
    }

    #[test]
    fn test_persist_before_next_is_ordering_error() {
        let mut workflow = workflow(MockVersionControl::new());
        let err = workflow.persist(&ReleaseNotes::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The next version is not set. Maybe the release steps ran out of order."
        );
    }

    #[test]
    fn test_first_release_starts_from_initial_version() {
        let mut workflow = workflow(MockVersionControl::new());
        assert_eq!(workflow.resolve_current_version().unwrap(), "0.0.0");
        assert!(workflow.context().first_release);
        assert_eq!(
            workflow
                .compute_next_version(ReleaseKind::Minor, &Label::None)
                .unwrap(),
            "0.1.0"
        );
    }

    #[test]
    fn test_run_creates_tag() {
        let mut vcs = MockVersionControl::new();
        vcs.add_tag("v1.2.0");

        let mut workflow = workflow(vcs);
        let request = ReleaseRequest {
            kind: ReleaseKind::Minor,
            ..ReleaseRequest::default()
        };

        let outcome = workflow.run(&request).unwrap();
        assert_eq!(outcome.previous_version.as_deref(), Some("1.2.0"));
        assert_eq!(outcome.version, "1.3.0");
        assert_eq!(outcome.tag.as_deref(), Some("v1.3.0"));
        assert!(!outcome.changelog_updated);
        assert!(!outcome.published);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG");
        let manager = ChangelogManager::open(&path, Box::new(SimpleFormatter::new())).unwrap();

        let mut vcs = MockVersionControl::new();
        vcs.add_tag("v1.0.0");

        let mut workflow = workflow(vcs)
            .with_changelog(ChangelogStep::new(manager, true, true))
            .with_dry_run(true);

        let outcome = workflow.run(&ReleaseRequest::default()).unwrap();
        assert_eq!(outcome.version, "1.0.1");
        assert_eq!(outcome.tag, None);
        assert!(!outcome.changelog_updated);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_request_uses_configured_defaults() {
        let config = GeneratorConfig {
            release_kind: Some(ReleaseKind::Major),
            label: Some("beta".to_string()),
            allow_label: true,
            ..GeneratorConfig::default()
        };

        let request = ReleaseRequest::resolve(&config, None, None, Some("  ".to_string())).unwrap();
        assert_eq!(request.kind, ReleaseKind::Major);
        assert_eq!(request.label, Label::Named("beta".to_string()));
        assert_eq!(request.comment, None);

        let request =
            ReleaseRequest::resolve(&config, Some(ReleaseKind::Patch), Some("none"), None).unwrap();
        assert_eq!(request.kind, ReleaseKind::Patch);
        assert_eq!(request.label, Label::None);
    }

    #[test]
    fn test_request_rejects_label_when_disabled() {
        let err = ReleaseRequest::resolve(&GeneratorConfig::default(), None, Some("rc"), None)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
    }
}

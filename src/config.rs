use crate::changelog::{
    ChangelogFormatter, ChangelogManager, Dialect, PrefixGroupOptions,
};
use crate::clock::{system_clock, Clock};
use crate::domain::{Label, ReleaseKind, TagPrefix};
use crate::error::{ReleaseError, Result};
use crate::generator::{SemanticGenerator, SimpleGenerator, VersionGenerator};
use crate::persister::changelog::DEFAULT_LOCATION;
use crate::persister::{ChangelogPersister, TagPersister, VersionPersister};
use crate::vcs::{Git2VersionControl, NoopVersionControl, VersionControl};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Project configuration file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "release.toml";

/// Configuration file looked up in the user config directory
pub const USER_CONFIG_FILE: &str = "git-release.toml";

/// Represents the complete configuration for git-release.
///
/// Each table selects and tunes one collaborator of the release workflow.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub persister: PersisterConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub vcs: VcsConfig,
}

/// Versioning scheme
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Semantic,
    Simple,
}

/// How the next version is computed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub scheme: Scheme,

    /// Fixed release kind; asked for on the command line otherwise
    #[serde(default)]
    pub release_kind: Option<ReleaseKind>,

    /// Fixed pre-release label
    #[serde(default)]
    pub label: Option<String>,

    /// Whether pre-release labels are honoured at all
    #[serde(default)]
    pub allow_label: bool,
}

/// Where released versions are recorded
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Tag,
    Changelog,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

/// Configuration of the version persister.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PersisterConfig {
    #[serde(default)]
    pub strategy: Strategy,

    /// Tag prefix template, may use `{branch-name}` and `{date}`
    #[serde(default)]
    pub tag_prefix: String,

    /// Version pattern inside tags; the generator's own when unset
    #[serde(default)]
    pub tag_pattern: Option<String>,

    /// Changelog file for the changelog strategy
    #[serde(default = "default_location")]
    pub location: String,
}

impl Default for PersisterConfig {
    fn default() -> Self {
        PersisterConfig {
            strategy: Strategy::default(),
            tag_prefix: String::new(),
            tag_pattern: None,
            location: default_location(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Changelog update performed before a release is persisted.
///
/// The dialect also applies to the changelog persister.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChangelogConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_location")]
    pub file: String,

    #[serde(default)]
    pub dialect: Dialect,

    #[serde(default)]
    pub default_group: Option<String>,

    #[serde(default)]
    pub groups: Vec<String>,

    #[serde(default)]
    pub ignore_groups: Vec<String>,

    /// Add the commits made since the last release as detail lines
    #[serde(default = "default_true")]
    pub dump_commits: bool,

    #[serde(default = "default_true")]
    pub exclude_merge_commits: bool,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            enabled: false,
            file: default_location(),
            dialect: Dialect::default(),
            default_group: None,
            groups: Vec::new(),
            ignore_groups: Vec::new(),
            dump_commits: true,
            exclude_merge_commits: true,
        }
    }
}

/// Version control backend
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Git,
    Noop,
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Configuration of the version control collaborator.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VcsConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Push the release tag once created
    #[serde(default)]
    pub publish: bool,
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            backend: Backend::default(),
            remote: default_remote(),
            publish: false,
        }
    }
}

impl Config {
    /// Check everything that can be checked without touching the project
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is usable
    /// * `Err(ReleaseError::Config)` - First problem found
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.persister.tag_pattern {
            Regex::new(pattern).map_err(|e| {
                ReleaseError::config(format!("Invalid tag_pattern '{}': {}", pattern, e))
            })?;
        }

        TagPrefix::new(self.persister.tag_prefix.as_str())?;

        if let Some(label) = &self.generator.label {
            let parsed = Label::parse(label)
                .map_err(|e| ReleaseError::config(format!("Invalid label: {}", e)))?;

            if !self.generator.allow_label && parsed != Label::None {
                return Err(ReleaseError::config(format!(
                    "Label '{}' is set but allow_label is false",
                    label
                )));
            }
        }

        if self.persister.location.trim().is_empty() {
            return Err(ReleaseError::config("persister.location cannot be empty"));
        }

        if self.changelog.file.trim().is_empty() {
            return Err(ReleaseError::config("changelog.file cannot be empty"));
        }

        // The changelog persister already inserts every release into its file
        if self.persister.strategy == Strategy::Changelog
            && self.changelog.enabled
            && Path::new(self.persister.location.trim()) == Path::new(self.changelog.file.trim())
        {
            return Err(ReleaseError::config(format!(
                "changelog.file and persister.location both point to '{}'; \
                 disable [changelog] or use another file",
                self.changelog.file
            )));
        }

        self.prefix_group_options()?;

        Ok(())
    }

    /// The version generator for the configured scheme
    pub fn generator(&self) -> Arc<dyn VersionGenerator> {
        match self.generator.scheme {
            Scheme::Semantic => Arc::new(SemanticGenerator::new()),
            Scheme::Simple => Arc::new(SimpleGenerator::new()),
        }
    }

    pub fn prefix_group_options(&self) -> Result<PrefixGroupOptions> {
        PrefixGroupOptions::new(
            self.changelog.default_group.as_deref(),
            self.changelog.groups.as_slice(),
            self.changelog.ignore_groups.as_slice(),
        )
    }

    /// The formatter for the configured dialect
    pub fn formatter(&self, clock: Clock) -> Result<Box<dyn ChangelogFormatter>> {
        Ok(self
            .changelog
            .dialect
            .formatter(self.prefix_group_options()?, clock))
    }

    /// The version persister for the configured strategy
    ///
    /// # Arguments
    /// * `root` - Project root the changelog location is relative to
    /// * `generator` - Orders versions found in tags
    pub fn persister(
        &self,
        root: &Path,
        generator: Arc<dyn VersionGenerator>,
    ) -> Result<Box<dyn VersionPersister>> {
        match self.persister.strategy {
            Strategy::Tag => {
                let prefix = TagPrefix::new(self.persister.tag_prefix.as_str())?;
                Ok(Box::new(TagPersister::new(
                    generator,
                    prefix,
                    self.persister.tag_pattern.clone(),
                )?))
            }
            Strategy::Changelog => {
                let manager = ChangelogManager::open(
                    root.join(&self.persister.location),
                    self.formatter(system_clock)?,
                )?;
                Ok(Box::new(ChangelogPersister::new(manager)))
            }
        }
    }

    /// The changelog updated before persisting, if enabled
    pub fn changelog_manager(&self, root: &Path) -> Result<Option<ChangelogManager>> {
        if !self.changelog.enabled {
            return Ok(None);
        }

        let manager = ChangelogManager::open(
            root.join(&self.changelog.file),
            self.formatter(system_clock)?,
        )?;
        Ok(Some(manager))
    }

    /// The version control backend, opened at `root`
    pub fn version_control(&self, root: &Path) -> Result<Box<dyn VersionControl>> {
        match self.vcs.backend {
            Backend::Git => Ok(Box::new(Git2VersionControl::open(root)?)),
            Backend::Noop => Ok(Box::new(NoopVersionControl)),
        }
    }

    /// Label configured for every release, `none` when labels are disabled
    pub fn default_label(&self) -> Result<Label> {
        match (&self.generator.label, self.generator.allow_label) {
            (Some(label), true) => Label::parse(label),
            _ => Ok(Label::None),
        }
    }
}

/// Parse and validate a configuration document
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| ReleaseError::config(format!("Invalid configuration: {}", e)))?;

    config.validate()?;
    Ok(config)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `git-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path: Option<PathBuf> = if let Some(path) = config_path {
        Some(PathBuf::from(path))
    } else if Path::new(PROJECT_CONFIG_FILE).exists() {
        Some(PathBuf::from(PROJECT_CONFIG_FILE))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(USER_CONFIG_FILE))
            .filter(|path| path.exists())
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration");
            let content = fs::read_to_string(&path).map_err(|e| ReleaseError::io(&path, e))?;
            parse_config(&content)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

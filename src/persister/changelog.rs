use crate::changelog::{ChangelogManager, ReleaseNotes};
use crate::error::Result;
use crate::persister::VersionPersister;
use crate::vcs::VersionControl;

/// Default changelog location, relative to the project root
pub const DEFAULT_LOCATION: &str = "CHANGELOG";

/// Uses the changelog as the record of released versions; the version
/// itself stands in for a tag.
pub struct ChangelogPersister {
    manager: ChangelogManager,
}

impl ChangelogPersister {
    pub fn new(manager: ChangelogManager) -> Self {
        ChangelogPersister { manager }
    }

    pub fn manager(&self) -> &ChangelogManager {
        &self.manager
    }
}

impl VersionPersister for ChangelogPersister {
    fn current_version(&self, _vcs: &dyn VersionControl) -> Result<String> {
        self.manager.current_version()
    }

    fn save(&self, version: &str, _vcs: &dyn VersionControl, notes: &ReleaseNotes) -> Result<String> {
        self.manager.update(&notes.entry(version))?;
        Ok(version.to_string())
    }

    fn tag_from_version(&self, version: &str, _vcs: &dyn VersionControl) -> Result<String> {
        Ok(version.to_string())
    }
}

//! Where released versions are recorded
//!
//! A persister recovers the current version and records new ones. Two
//! strategies exist: VCS tags ([TagPersister]) and the changelog file itself
//! ([ChangelogPersister]).

pub mod changelog;
pub mod tag;

pub use changelog::ChangelogPersister;
pub use tag::TagPersister;

use crate::changelog::ReleaseNotes;
use crate::error::Result;
use crate::vcs::VersionControl;

/// Storage strategy for released versions
pub trait VersionPersister {
    /// The most recent released version
    ///
    /// # Returns
    /// * `Err(ReleaseError::NoReleaseFound)` - If nothing was released yet
    fn current_version(&self, vcs: &dyn VersionControl) -> Result<String>;

    /// Record `version` as released and return the tag naming it
    fn save(&self, version: &str, vcs: &dyn VersionControl, notes: &ReleaseNotes)
        -> Result<String>;

    /// The tag naming the current version
    fn current_version_tag(&self, vcs: &dyn VersionControl) -> Result<String> {
        let version = self.current_version(vcs)?;
        self.tag_from_version(&version, vcs)
    }

    /// The tag that names `version` under this strategy, without creating it
    fn tag_from_version(&self, version: &str, vcs: &dyn VersionControl) -> Result<String>;
}

//! Version control abstraction layer
//!
//! The release engine only needs a handful of operations from the version
//! control system: list tags, create a tag, name the current branch, and
//! summarize the commits made since a tag. They are captured by the
//! [VersionControl] trait so the engine can run against:
//!
//! - [repository::Git2VersionControl]: a real repository through the `git2` crate
//! - [noop::NoopVersionControl]: projects without version control
//! - [mock::MockVersionControl]: an in-memory implementation for tests
//!
//! # Usage
//!
//! ```rust
//! # use git_release::vcs::{MockVersionControl, VersionControl};
//! let mut vcs = MockVersionControl::new();
//! vcs.add_tag("v1.0.0");
//! vcs.create_tag("v1.1.0").unwrap();
//! assert_eq!(vcs.tags().unwrap(), vec!["v1.0.0", "v1.1.0"]);
//! ```

pub mod mock;
pub mod noop;
pub mod repository;

pub use mock::MockVersionControl;
pub use noop::NoopVersionControl;
pub use repository::Git2VersionControl;

use crate::error::Result;

/// Operations the release engine consumes from a version control system
///
/// ## Error Handling
///
/// Every call is treated as all-or-nothing. Implementations map their
/// underlying failures to [crate::error::ReleaseError] and the engine
/// propagates them unmodified, without retrying.
pub trait VersionControl {
    /// Snapshot of all tag names
    fn tags(&self) -> Result<Vec<String>>;

    /// Create a tag named `name` on the current HEAD
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists or there is no commit to tag
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Branch name (e.g. "main")
    /// * `Err` - If HEAD is detached or unborn
    fn current_branch(&self) -> Result<String>;

    /// One-line summaries (`<short-hash> <subject>`) of the commits made since
    /// `tag`, newest first
    ///
    /// # Arguments
    /// * `tag` - Tag marking the previous release
    /// * `exclude_merges` - Skip commits with more than one parent
    fn modifications_since(&self, tag: &str, exclude_merges: bool) -> Result<Vec<String>>;

    /// Push a tag to a remote
    fn publish_tag(&self, tag: &str, remote: &str) -> Result<()>;
}

impl<T: VersionControl + ?Sized> VersionControl for std::rc::Rc<T> {
    fn tags(&self) -> Result<Vec<String>> {
        (**self).tags()
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        (**self).create_tag(name)
    }

    fn current_branch(&self) -> Result<String> {
        (**self).current_branch()
    }

    fn modifications_since(&self, tag: &str, exclude_merges: bool) -> Result<Vec<String>> {
        (**self).modifications_since(tag, exclude_merges)
    }

    fn publish_tag(&self, tag: &str, remote: &str) -> Result<()> {
        (**self).publish_tag(tag, remote)
    }
}

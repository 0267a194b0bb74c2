use crate::error::Result;
use crate::vcs::VersionControl;

/// Version control stand-in for projects that are not under version control.
///
/// Reads return nothing and writes are accepted and ignored, so a project can
/// still version itself through the changelog persister.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVersionControl;

impl VersionControl for NoopVersionControl {
    fn tags(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn create_tag(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(String::new())
    }

    fn modifications_since(&self, _tag: &str, _exclude_merges: bool) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn publish_tag(&self, _tag: &str, _remote: &str) -> Result<()> {
        Ok(())
    }
}

use crate::changelog::{ChangelogFormatter, ReleaseEntry};
use crate::error::{ReleaseError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Reads, transforms and rewrites one changelog file
pub struct ChangelogManager {
    path: PathBuf,
    formatter: Box<dyn ChangelogFormatter>,
}

impl ChangelogManager {
    /// Open a changelog, creating it empty when it does not exist yet
    ///
    /// # Returns
    /// * `Err(ReleaseError::Io)` - If the path is not a regular file or is
    ///   read-only
    pub fn open(path: impl AsRef<Path>, formatter: Box<dyn ChangelogFormatter>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!(path = %path.display(), "Creating empty changelog");
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| ReleaseError::io(&path, e))?;
        }

        let metadata = fs::metadata(&path).map_err(|e| ReleaseError::io(&path, e))?;

        if !metadata.is_file() {
            return Err(ReleaseError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::Other, "not a regular file"),
            ));
        }

        if metadata.permissions().readonly() {
            return Err(ReleaseError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "file is read-only"),
            ));
        }

        Ok(ChangelogManager { path, formatter })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recent version recorded in the changelog
    ///
    /// # Returns
    /// * `Err(ReleaseError::NoReleaseFound)` - If the dialect's pattern does
    ///   not match, or matches an empty version
    pub fn current_version(&self) -> Result<String> {
        let content = self.read_content()?;

        self.formatter
            .last_version_regex()
            .captures(&content)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim())
            .filter(|version| !version.is_empty())
            .map(|version| version.to_string())
            .ok_or_else(|| {
                ReleaseError::no_release(format!(
                    "{} does not contain a readable last version number",
                    self.path.display()
                ))
            })
    }

    /// Insert a release and rewrite the whole file
    ///
    /// The new content is written next to the changelog and renamed over it,
    /// so a failure leaves the previous content in place. The file keeps its
    /// permissions, and a symlinked changelog stays a symlink.
    pub fn update(&self, entry: &ReleaseEntry<'_>) -> Result<()> {
        let lines = split_lines(&self.read_content()?);
        let lines = self.formatter.update_existing_lines(lines, entry)?;

        self.write_atomically(&lines.join("\n"))?;

        info!(path = %self.path.display(), version = entry.version, "Changelog updated");
        Ok(())
    }

    fn read_content(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| ReleaseError::io(&self.path, e))
    }

    fn write_atomically(&self, content: &str) -> Result<()> {
        let target = fs::canonicalize(&self.path).map_err(|e| ReleaseError::io(&self.path, e))?;
        let permissions = fs::metadata(&target)
            .map_err(|e| ReleaseError::io(&target, e))?
            .permissions();
        let dir = target.parent().unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir).map_err(|e| ReleaseError::io(dir, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ReleaseError::io(file.path(), e))?;
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| ReleaseError::io(file.path(), e))?;
        file.persist(&target)
            .map_err(|e| ReleaseError::io(&target, e.error))?;

        Ok(())
    }
}

/// Split on `\n` only: lines ending in `\r\n` keep their `\r`, and a final
/// terminator does not produce an empty last line.
fn split_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.split('\n').map(String::from).collect();

    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::formatter::{AddTopFormatter, SemanticFormatter, SimpleFormatter};
    use crate::domain::ReleaseKind;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 8)
            .unwrap()
            .and_hms_opt(12, 34, 0)
            .unwrap()
    }

    fn simple() -> Box<dyn ChangelogFormatter> {
        Box::new(SimpleFormatter::new().with_clock(fixed_clock))
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG");

        let manager = ChangelogManager::open(&path, simple()).unwrap();

        assert!(path.is_file());
        assert_eq!(manager.path(), path.as_path());
    }

    #[test]
    fn test_open_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let err = ChangelogManager::open(dir.path(), simple()).err().unwrap();
        assert!(matches!(err, ReleaseError::Io { .. }));
    }

    #[test]
    fn test_empty_changelog_has_no_release() {
        let dir = TempDir::new().unwrap();
        let manager = ChangelogManager::open(dir.path().join("CHANGELOG"), simple()).unwrap();

        assert!(manager.current_version().unwrap_err().is_no_release_found());
    }

    #[test]
    fn test_update_then_current_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG");
        fs::write(&path, "01/10/2024 09:00  1.0.0  first\n").unwrap();

        let manager = ChangelogManager::open(&path, simple()).unwrap();
        assert_eq!(manager.current_version().unwrap(), "1.0.0");

        manager
            .update(&ReleaseEntry::new("1.1.0").with_comment("second"))
            .unwrap();

        assert_eq!(manager.current_version().unwrap(), "1.1.0");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "08/11/2024 12:34  1.1.0  second\n01/10/2024 09:00  1.0.0  first"
        );
    }

    #[test]
    fn test_failed_update_keeps_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG");
        fs::write(&path, "no headings here").unwrap();

        let manager = ChangelogManager::open(
            &path,
            Box::new(SemanticFormatter::new().with_clock(fixed_clock)),
        )
        .unwrap();

        let err = manager
            .update(&ReleaseEntry::new("1.0.1").with_kind(ReleaseKind::Patch))
            .unwrap_err();

        assert!(matches!(err, ReleaseError::Format(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "no headings here");
    }

    #[test]
    fn test_split_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb"), vec!["a\r", "b"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
    }

    #[test]
    fn test_update_keeps_crlf_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG");
        fs::write(&path, "old line one\r\nold line two\r\n").unwrap();

        let manager = ChangelogManager::open(&path, simple()).unwrap();
        manager.update(&ReleaseEntry::new("1.1.0")).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "08/11/2024 12:34  1.1.0  \nold line one\r\nold line two\r"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_update_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG");
        fs::write(&path, "01/10/2024 09:00  1.0.0  first\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let manager = ChangelogManager::open(&path, simple()).unwrap();
        manager.update(&ReleaseEntry::new("1.1.0")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_update_writes_through_symlink() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("HISTORY");
        let link = dir.path().join("CHANGELOG");
        fs::write(&real, "").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let manager = ChangelogManager::open(&link, simple()).unwrap();
        manager.update(&ReleaseEntry::new("1.0.0")).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "08/11/2024 12:34  1.0.0  ");
    }

    #[test]
    fn test_add_top_current_version_is_first_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGES.md");

        let manager = ChangelogManager::open(&path, Box::new(AddTopFormatter::new())).unwrap();
        manager.update(&ReleaseEntry::new("0.3.0")).unwrap();

        assert_eq!(manager.current_version().unwrap(), "0.3.0");
    }
}

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    Validation(String),

    #[error("No release found: {0}")]
    NoReleaseFound(String),

    #[error("The {0} is not set. Maybe the release steps ran out of order.")]
    Ordering(String),

    #[error("Invalid changelog formatting: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Version control error: {0}")]
    Vcs(String),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        ReleaseError::Validation(msg.into())
    }

    /// Create a "no release found" error with context
    pub fn no_release(msg: impl Into<String>) -> Self {
        ReleaseError::NoReleaseFound(msg.into())
    }

    /// Create an ordering error naming the missing value
    pub fn ordering(field: impl Into<String>) -> Self {
        ReleaseError::Ordering(field.into())
    }

    /// Create a changelog format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        ReleaseError::Format(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an I/O error bound to the file it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ReleaseError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a version control error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        ReleaseError::Vcs(msg.into())
    }

    /// True when no prior release could be resolved.
    ///
    /// Callers use this to treat the run as a first release instead of aborting.
    pub fn is_no_release_found(&self) -> bool {
        matches!(self, ReleaseError::NoReleaseFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("unknown placeholder [foo]");
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown placeholder [foo]"
        );
    }

    #[test]
    fn test_ordering_error_names_field() {
        let err = ReleaseError::ordering("next version");
        assert_eq!(
            err.to_string(),
            "The next version is not set. Maybe the release steps ran out of order."
        );
    }

    #[test]
    fn test_io_error_mentions_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ReleaseError::io("CHANGELOG", io_err);
        let msg = err.to_string();
        assert!(msg.contains("CHANGELOG"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_is_no_release_found() {
        assert!(ReleaseError::no_release("no tags").is_no_release_found());
        assert!(!ReleaseError::validation("1.2").is_no_release_found());
        assert!(!ReleaseError::format("missing heading").is_no_release_found());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::validation("x"), "Invalid version"),
            (ReleaseError::no_release("x"), "No release found"),
            (ReleaseError::format("x"), "Invalid changelog formatting"),
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::vcs("x"), "Version control error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}

//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not generation
//! logic. Catalog and naming errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The target root exists and is not an empty directory.
    #[error("Directory already exists at {path}: {reason}")]
    DirectoryExists { path: PathBuf, reason: String },

    /// A filesystem operation failed.
    #[error("Failed to {operation} {path}: {reason}")]
    Filesystem {
        path: PathBuf,
        operation: &'static str,
        reason: String,
    },

    /// Emission failed after writing started; everything written was removed.
    #[error("{original} (partial output under {path} was rolled back)")]
    RolledBack { path: PathBuf, original: String },

    /// Emission failed and the partial tree could not be removed.
    #[error("{original}; rollback of {path} also failed: {reason}")]
    RollbackFailed {
        path: PathBuf,
        reason: String,
        original: String,
    },

    /// No catalog is registered for the requested variant.
    #[error("Template resolution failed: {reason}")]
    TemplateResolution { reason: String },

    /// A shared lock was poisoned by a panicking thread.
    #[error("Internal lock poisoned: {what}")]
    LockPoisoned { what: &'static str },
}

impl ApplicationError {
    /// Build a `Filesystem` error from an I/O failure.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            operation,
            reason: err.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DirectoryExists { path, .. } => vec![
                format!("Nothing was written; {} was left untouched", path.display()),
                "Choose a different project name".into(),
                "Or remove the existing directory and run the command again".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Check that you can write to {}", path.display()),
                "Ensure the output directory exists".into(),
            ],
            Self::RolledBack { path, .. } => vec![
                format!(
                    "Everything written under {} was removed again",
                    path.display()
                ),
                "Check permissions and free space, then run the command again".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Remove {} by hand before retrying", path.display()),
                "Check the permissions of the output directory".into(),
            ],
            Self::TemplateResolution { reason } => vec![
                format!("Resolution failed: {reason}"),
                "Try: fastforge list to see available variants".into(),
            ],
            Self::LockPoisoned { .. } => vec![
                "A previous operation panicked while holding a lock".into(),
                "Please report this issue".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryExists { .. } => ErrorCategory::Conflict,
            Self::Filesystem { .. } | Self::RolledBack { .. } | Self::RollbackFailed { .. } => {
                ErrorCategory::Io
            }
            Self::TemplateResolution { .. } => ErrorCategory::TemplateResolution,
            Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_operation_and_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ApplicationError::io("write", "/tmp/x/.env", &io);
        assert_eq!(err.to_string(), "Failed to write /tmp/x/.env: denied");
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn plain_io_failure_does_not_claim_a_rollback() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ApplicationError::io("create directory", "/missing/blog_api", &io);
        assert!(err.suggestions().iter().all(|s| !s.contains("removed")));

        let rolled = ApplicationError::RolledBack {
            path: "/out/blog_api".into(),
            original: err.to_string(),
        };
        assert_eq!(rolled.category(), ErrorCategory::Io);
        assert!(rolled.to_string().starts_with("Failed to create directory"));
        assert!(rolled.suggestions()[0].contains("removed"));
    }

    #[test]
    fn conflict_category() {
        let err = ApplicationError::DirectoryExists {
            path: "blog_api".into(),
            reason: "directory is not empty".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.suggestions()[0].contains("untouched"));
    }
}

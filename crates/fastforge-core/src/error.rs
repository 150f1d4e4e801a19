//! Unified error handling for FastForge Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for FastForge Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForgeError {
    /// Errors from the domain layer (naming, catalog, resolution).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (conflicts, I/O).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ForgeError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Check your config file: fastforge config path".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in FastForge".into(),
                "Please report this issue at: https://github.com/fastforge/fastforge/issues".into(),
            ],
        }
    }

    /// Get error category for display and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::InvalidName
                | crate::domain::ErrorCategory::Validation => ErrorCategory::InvalidInput,
                crate::domain::ErrorCategory::TemplateResolution => {
                    ErrorCategory::TemplateResolution
                }
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether emission started and was rolled back.
    pub fn was_rolled_back(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::RolledBack { .. })
        )
    }
}

/// Error categories for UI display and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid name, unknown or unsupported variant.
    InvalidInput,
    /// Target directory exists.
    Conflict,
    /// Filesystem failure during emission.
    Io,
    /// Catalog or consistency violation; raised before any write.
    TemplateResolution,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> ForgeResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> ForgeResult<T> {
        self.map_err(|e| ForgeError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_categories_map_to_forge_categories() {
        let err: ForgeError = DomainError::InvalidProjectName {
            name: String::new(),
            reason: "name is empty".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);

        let err: ForgeError = DomainError::UnknownPlaceholder {
            path: ".env".into(),
            token: "X".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::TemplateResolution);
    }

    #[test]
    fn transparent_display() {
        let err: ForgeError = DomainError::UnknownVariant("oracle".into()).into();
        assert_eq!(err.to_string(), "Unknown database variant: oracle");
    }

    #[test]
    fn context_wraps_as_internal() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = result.context("reading registry").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("reading registry: boom"));
    }
}

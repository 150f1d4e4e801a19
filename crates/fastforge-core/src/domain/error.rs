// ============================================================================
// domain/error.rs - COMPREHENSIVE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the unified `ForgeError` is `Clone`)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Project name errors
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Project name '{name}' derives the reserved package name '{package}'")]
    ReservedProjectName { name: String, package: String },

    // ========================================================================
    // Variant errors
    // ========================================================================
    #[error("Unknown database variant: {0}")]
    UnknownVariant(String),

    #[error("Database variant '{variant}' is not generated automatically")]
    UnsupportedVariant {
        variant: String,
        /// Manual migration steps, taken from the capability table.
        manual_steps: Vec<String>,
    },

    // ========================================================================
    // Template resolution errors
    // ========================================================================
    #[error("Invalid template catalog: {0}")]
    InvalidCatalog(String),

    #[error("Template catalog '{catalog_id}' has no files")]
    EmptyCatalog { catalog_id: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathTraversal { path: String },

    #[error("Duplicate path in generation plan: {path}")]
    DuplicatePath { path: String },

    #[error("Unknown placeholder '{{{{{token}}}}}' in {path}")]
    UnknownPlaceholder { path: String, token: String },

    #[error("Unresolved placeholder '{{{{{token}}}}}' in {path}")]
    UnresolvedPlaceholder { path: String, token: String },

    #[error("Placeholder declaration mismatch in {path}: {reason}")]
    PlaceholderMismatch { path: String, reason: String },

    #[error(
        "Inconsistent value for {{{{{token}}}}}: {first_path} has '{first_value}' \
         but {second_path} has '{second_value}'"
    )]
    InconsistentValue {
        token: String,
        first_path: String,
        first_value: String,
        second_path: String,
        second_value: String,
    },

    // ========================================================================
    // Settings errors
    // ========================================================================
    #[error("Invalid generation setting '{field}': {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { reason, .. } => vec![
                format!("Details: {reason}"),
                "Use letters, digits, hyphens and underscores".into(),
                "Examples: blog_api, inventory-service, shop2".into(),
            ],
            Self::ReservedProjectName { package, .. } => vec![
                format!("'{package}' is used inside the generated project"),
                "Choose a more specific name, e.g. my_app or app_service".into(),
            ],
            Self::UnknownVariant(_) => vec![
                "Supported variant: sqlite".into(),
                "Try: fastforge list".into(),
            ],
            Self::UnsupportedVariant { variant, manual_steps } => {
                let mut out = vec![
                    "Generate the sqlite baseline, then migrate by hand:".into(),
                    format!("  fastforge generate <name> --variant sqlite   # then switch to {variant}"),
                ];
                out.extend(manual_steps.iter().map(|s| format!("  • {s}")));
                out
            }
            Self::UnresolvedPlaceholder { .. }
            | Self::UnknownPlaceholder { .. }
            | Self::InconsistentValue { .. }
            | Self::PlaceholderMismatch { .. } => vec![
                "The built-in template catalog is inconsistent".into(),
                "Nothing was written to disk".into(),
                "Please report this issue".into(),
            ],
            Self::InvalidSetting { field, .. } => vec![
                format!("Check the [generation] {field} value in your config file"),
                "Try: fastforge config list".into(),
            ],
            Self::EmptyCatalog { catalog_id } => vec![
                format!("Catalog '{catalog_id}' is corrupted"),
                "Please report this issue".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::ReservedProjectName { .. } => {
                ErrorCategory::InvalidName
            }
            Self::UnknownVariant(_) | Self::UnsupportedVariant { .. } => ErrorCategory::Validation,
            Self::InvalidCatalog(_)
            | Self::EmptyCatalog { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathTraversal { .. }
            | Self::DuplicatePath { .. }
            | Self::UnknownPlaceholder { .. }
            | Self::UnresolvedPlaceholder { .. }
            | Self::PlaceholderMismatch { .. }
            | Self::InconsistentValue { .. } => ErrorCategory::TemplateResolution,
            Self::InvalidSetting { .. } => ErrorCategory::Configuration,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidName,
    Validation,
    TemplateResolution,
    Configuration,
    Internal,
}

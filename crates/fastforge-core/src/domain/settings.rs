//! Shared configuration values bound into every generated project.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Internal package every generated project places its code under.
pub const APP_PACKAGE: &str = "app";

/// Directory holding the migration environment and revisions.
pub const MIGRATIONS_DIR: &str = "alembic";

/// Values shared across generated files.
///
/// Deserialized from the `[generation]` section of the CLI config; missing
/// keys fall back to [`GenerationSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// SQLite database file, relative to the project root.
    pub database_file: String,
    pub server_port: u16,
    /// `requires-python` specifier written to the manifest.
    pub python_requires: String,
    pub venv_dir: String,
    pub app_version: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            database_file: "app.db".into(),
            server_port: 8000,
            python_requires: ">=3.8".into(),
            venv_dir: ".venv".into(),
            app_version: "0.1.0".into(),
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_file_name("database_file", &self.database_file)?;
        check_file_name("venv_dir", &self.venv_dir)?;

        if self.server_port == 0 {
            return Err(DomainError::InvalidSetting {
                field: "server_port",
                reason: "port must be between 1 and 65535".into(),
            });
        }

        if self.python_requires.trim().is_empty() {
            return Err(DomainError::InvalidSetting {
                field: "python_requires",
                reason: "cannot be empty".into(),
            });
        }

        if self.app_version.trim().is_empty() || self.app_version.contains(char::is_whitespace) {
            return Err(DomainError::InvalidSetting {
                field: "app_version",
                reason: format!("'{}' is not a version string", self.app_version),
            });
        }

        Ok(())
    }
}

/// Values that end up in shell commands and URLs must be a single plain
/// path segment.
fn check_file_name(field: &'static str, value: &str) -> Result<(), DomainError> {
    let valid = !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidSetting {
            field,
            reason: format!("'{value}' must be a plain file name ([A-Za-z0-9._-])"),
        })
    }
}

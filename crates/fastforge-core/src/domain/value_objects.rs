//! Domain value objects: DatabaseVariant, FileRole.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! They hold NO capability logic. Driver names and support status live in
//! `capabilities.rs`. This file's only job is to define the types, their
//! string representations, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add a capability entry in `capabilities.rs`
//! 4. Done, nothing else changes

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DatabaseVariant ───────────────────────────────────────────────────────────

/// Database backend selecting which template catalog is used.
///
/// Only [`DatabaseVariant::Sqlite`] is generated end-to-end; the others are
/// documented manual follow-ups (see `capabilities::VARIANT_REGISTRY`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseVariant {
    #[default]
    Sqlite,
    Postgres,
    Mongo,
}

impl DatabaseVariant {
    pub const ALL: [DatabaseVariant; 3] = [Self::Sqlite, Self::Postgres, Self::Mongo];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Mongo => "mongo",
        }
    }

    /// Whether the generator emits this variant end-to-end.
    ///
    /// Delegates to the capability table.
    pub fn is_generator_supported(self) -> bool {
        crate::domain::capabilities::variant_def(self).generator_supported
    }
}

impl fmt::Display for DatabaseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseVariant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => Err(DomainError::UnknownVariant(other.to_string())),
        }
    }
}

// ── FileRole ──────────────────────────────────────────────────────────────────

/// Logical role of a generated file.
///
/// Roles are what the catalog is organised by; paths are an attribute of
/// the role within one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    Manifest,
    EnvFile,
    MigrationConfig,
    Readme,
    PackageInit,
    EntryPoint,
    DeclarativeBase,
    SessionModule,
    Models,
    Schemas,
    HomeRouter,
    MigrationEnv,
    MigrationScriptTemplate,
    MigrationVersionsKeep,
    PosixSetupScript,
    WindowsSetupScript,
}

impl FileRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::EnvFile => "env-file",
            Self::MigrationConfig => "migration-config",
            Self::Readme => "readme",
            Self::PackageInit => "package-init",
            Self::EntryPoint => "entry-point",
            Self::DeclarativeBase => "declarative-base",
            Self::SessionModule => "session-module",
            Self::Models => "models",
            Self::Schemas => "schemas",
            Self::HomeRouter => "home-router",
            Self::MigrationEnv => "migration-env",
            Self::MigrationScriptTemplate => "migration-script-template",
            Self::MigrationVersionsKeep => "migration-versions-keep",
            Self::PosixSetupScript => "posix-setup-script",
            Self::WindowsSetupScript => "windows-setup-script",
        }
    }

    /// Whether more than one file in a catalog may carry this role.
    pub const fn allows_many(&self) -> bool {
        matches!(self, Self::PackageInit)
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

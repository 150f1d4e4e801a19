//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `fastforge-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{DatabaseVariant, TemplateCatalog};
use crate::error::ForgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `fastforge_adapters::filesystem::LocalFilesystem` (production)
/// - `fastforge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Write operations report failures as `ApplicationError::Filesystem`.
/// `create_dir` must fail when the parent is missing; the emitter relies on
/// it to never create directories outside the project root.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether an existing directory has no entries.
    fn is_empty_dir(&self, path: &Path) -> ForgeResult<bool>;

    /// Create a single directory. The parent must exist.
    fn create_dir(&self, path: &Path) -> ForgeResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Write content to a file, creating or truncating it.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ForgeResult<()>;
}

/// Port for the static template catalog registry.
///
/// Implemented by `fastforge_adapters::registry::BuiltinRegistry`.
pub trait TemplateRegistry: Send + Sync {
    /// The catalog for a variant.
    ///
    /// # Errors
    /// `ApplicationError::TemplateResolution` when no catalog is registered.
    fn lookup(&self, variant: DatabaseVariant) -> ForgeResult<TemplateCatalog>;

    /// Every registered catalog, ordered by variant.
    fn list(&self) -> ForgeResult<Vec<TemplateCatalog>>;
}

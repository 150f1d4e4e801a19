//! Local filesystem adapter using std::fs.

use std::path::Path;

use fastforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::ForgeResult,
};
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as occupied
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_empty_dir(&self, path: &Path) -> ForgeResult<bool> {
        let mut entries =
            std::fs::read_dir(path).map_err(|e| ApplicationError::io("read directory", path, &e))?;
        Ok(entries.next().is_none())
    }

    fn create_dir(&self, path: &Path) -> ForgeResult<()> {
        trace!(path = %path.display(), "create_dir");
        std::fs::create_dir(path)
            .map_err(|e| ApplicationError::io("create directory", path, &e).into())
    }

    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::create_dir_all(path)
            .map_err(|e| ApplicationError::io("create directory", path, &e).into())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write_file");
        std::fs::write(path, content).map_err(|e| ApplicationError::io("write", path, &e).into())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if executable {
                let metadata = std::fs::metadata(path)
                    .map_err(|e| ApplicationError::io("read metadata of", path, &e))?;
                let mut perms = metadata.permissions();
                perms.set_mode(perms.mode() | 0o111);
                std::fs::set_permissions(path, perms)
                    .map_err(|e| ApplicationError::io("set permissions on", path, &e))?;
            }
        }
        #[cfg(not(unix))]
        {
            // No executable bit outside unix
            let _ = (path, executable);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        trace!(path = %path.display(), "remove_dir_all");
        std::fs::remove_dir_all(path).map_err(|e| ApplicationError::io("remove", path, &e).into())
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        trace!(path = %path.display(), "remove_file");
        std::fs::remove_file(path).map_err(|e| ApplicationError::io("remove", path, &e).into())
    }
}

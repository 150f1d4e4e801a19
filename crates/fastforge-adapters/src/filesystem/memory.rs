//! In-memory filesystem adapter for testing.
//!
//! Mirrors the `std::fs` semantics the emitter depends on (`create_dir`
//! needs an existing parent, writes need an existing directory) and can be
//! told to fail a specific write, which is how rollback is exercised without
//! touching a real disk.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use fastforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::ForgeResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// service.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    writes: usize,
    fail_on_write: Option<usize>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a directory and its ancestors.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        {
            let mut inner = self.write_lock_unchecked();
            let mut current = PathBuf::new();
            for component in path.as_ref().components() {
                current.push(component);
                inner.directories.insert(current.clone());
            }
        }
        self
    }

    /// Make the `n`th `write_file` call (1-based, counted from now on) fail.
    pub fn fail_on_write(self, n: usize) -> Self {
        {
            let mut inner = self.write_lock_unchecked();
            inner.writes = 0;
            inner.fail_on_write = Some(n);
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read_lock().files.get(path.as_ref()).cloned()
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        self.read_lock().executables.contains(path.as_ref())
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read_lock().files.keys().cloned().collect()
    }

    /// Every file with its content, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.read_lock().files.clone()
    }

    /// Number of `write_file` calls attempted so far.
    pub fn write_count(&self) -> usize {
        self.read_lock().writes
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        // A poisoned lock only happens after a test already panicked
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock_unchecked(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> ForgeResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| {
            ApplicationError::LockPoisoned {
                what: "memory filesystem",
            }
            .into()
        })
    }
}

impl MemoryFilesystemInner {
    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    /// The filesystem root (`/`, or the empty relative base) always exists.
    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            None => true,
            Some(parent) if parent.as_os_str().is_empty() || parent.parent().is_none() => true,
            Some(parent) => self.is_dir(parent),
        }
    }
}

fn fs_error(operation: &'static str, path: &Path, reason: &str) -> ApplicationError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        operation,
        reason: reason.into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let inner = self.read_lock();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read_lock().is_dir(path)
    }

    fn is_empty_dir(&self, path: &Path) -> ForgeResult<bool> {
        let inner = self.read_lock();
        if !inner.is_dir(path) {
            return Err(fs_error("read directory", path, "not a directory").into());
        }
        let has_child = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .any(|p| p.parent() == Some(path));
        Ok(!has_child)
    }

    fn create_dir(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write_lock()?;
        if inner.files.contains_key(path) || inner.directories.contains(path) {
            return Err(fs_error("create directory", path, "already exists").into());
        }
        if !inner.parent_exists(path) {
            return Err(fs_error("create directory", path, "parent directory does not exist").into());
        }
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write_lock()?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(fs_error("create directory", &current, "is a file").into());
            }
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        let mut inner = self.write_lock()?;
        inner.writes += 1;

        if inner.fail_on_write == Some(inner.writes) {
            return Err(fs_error("write", path, "injected failure").into());
        }
        if inner.is_dir(path) {
            return Err(fs_error("write", path, "is a directory").into());
        }
        if !inner.parent_exists(path) {
            return Err(fs_error("write", path, "parent directory does not exist").into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()> {
        let mut inner = self.write_lock()?;
        if !inner.files.contains_key(path) {
            return Err(fs_error("set permissions on", path, "no such file").into());
        }

        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }

        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write_lock()?;
        if !inner.is_dir(path) {
            return Err(fs_error("remove", path, "no such directory").into());
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write_lock()?;
        if inner.files.remove(path).is_none() {
            return Err(fs_error("remove", path, "no such file").into());
        }
        inner.executables.remove(path);
        Ok(())
    }
}

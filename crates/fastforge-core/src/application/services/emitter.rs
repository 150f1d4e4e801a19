//! Tree Emitter - all-or-nothing filesystem writes.
//!
//! Emission order is exactly plan order: every directory (one level at a
//! time, parents first), then every file. Any failure after something has
//! been created triggers a rollback that restores the root to its
//! pre-invocation state before the error is returned.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{GenerationPlan, PlanEntry},
    error::{ForgeError, ForgeResult},
};

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionReport {
    pub root: PathBuf,
    pub directories: usize,
    pub files: usize,
    /// The root already existed as an empty directory.
    pub reused_root: bool,
}

pub struct TreeEmitter<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> TreeEmitter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Write `plan` beneath `root`.
    ///
    /// # Errors
    /// - `DirectoryExists` when `root` is a file or a non-empty directory;
    ///   nothing is written
    /// - `Filesystem` when the first creation fails; nothing was written
    /// - `RolledBack` when a later write fails; the tree has been rolled back
    /// - `RollbackFailed` when the rollback itself failed
    #[instrument(skip_all, fields(root = %root.display(), plan_id = %plan.plan_id()))]
    pub fn emit(&self, plan: &GenerationPlan, root: &Path) -> ForgeResult<EmissionReport> {
        let reused_root = self.check_conflict(root)?;

        let mut created = Created::default();
        match self.write_all(plan, root, reused_root, &mut created) {
            Ok(report) => {
                info!(
                    directories = report.directories,
                    files = report.files,
                    "Project tree written"
                );
                Ok(report)
            }
            Err(err) if created.is_empty() => {
                debug!(error = %err, "Emission failed before anything was created");
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "Emission failed, rolling back");
                Err(self.rollback(root, &created, err))
            }
        }
    }

    /// Returns whether an existing empty root will be reused.
    fn check_conflict(&self, root: &Path) -> ForgeResult<bool> {
        if !self.filesystem.exists(root) {
            return Ok(false);
        }

        if !self.filesystem.is_dir(root) {
            return Err(ApplicationError::DirectoryExists {
                path: root.to_path_buf(),
                reason: "a file with this name already exists".into(),
            }
            .into());
        }

        if self.filesystem.is_empty_dir(root)? {
            debug!("Reusing existing empty directory");
            Ok(true)
        } else {
            Err(ApplicationError::DirectoryExists {
                path: root.to_path_buf(),
                reason: "directory is not empty".into(),
            }
            .into())
        }
    }

    fn write_all(
        &self,
        plan: &GenerationPlan,
        root: &Path,
        reused_root: bool,
        created: &mut Created,
    ) -> ForgeResult<EmissionReport> {
        if !reused_root {
            self.filesystem.create_dir(root)?;
            created.root = true;
        }

        let mut report = EmissionReport {
            root: root.to_path_buf(),
            directories: 0,
            files: 0,
            reused_root,
        };

        for entry in plan.entries() {
            match entry {
                PlanEntry::Directory(dir) => {
                    self.filesystem.create_dir(&root.join(dir))?;
                    if dir.is_top_level() {
                        created.top_level.push(root.join(dir));
                    }
                    report.directories += 1;
                }
                PlanEntry::File(file) => {
                    let path = root.join(&file.path);
                    // a failed write can still leave a truncated file behind
                    if file.path.is_top_level() {
                        created.top_level.push(path.clone());
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                    debug!(path = %file.path, role = %file.role, "Wrote file");
                    report.files += 1;
                }
            }
        }

        Ok(report)
    }

    /// Restore the pre-invocation state, returning the error to surface.
    ///
    /// A root created by this run is removed whole. A reused root is left in
    /// place, with its mode and any symlink intact, and only the entries
    /// written into it are removed.
    fn rollback(&self, root: &Path, created: &Created, original: ForgeError) -> ForgeError {
        let result = if created.root {
            self.filesystem.remove_dir_all(root)
        } else {
            self.remove_top_level(&created.top_level)
        };

        match result {
            Ok(()) => {
                info!("Rollback successful");
                ApplicationError::RolledBack {
                    path: root.to_path_buf(),
                    original: original.to_string(),
                }
                .into()
            }
            Err(rollback_err) => {
                error!(error = %rollback_err, path = %root.display(), "Rollback failed");
                ApplicationError::RollbackFailed {
                    path: root.to_path_buf(),
                    reason: rollback_err.to_string(),
                    original: original.to_string(),
                }
                .into()
            }
        }
    }

    fn remove_top_level(&self, entries: &[PathBuf]) -> ForgeResult<()> {
        for path in entries.iter().rev() {
            if !self.filesystem.exists(path) {
                continue;
            }
            if self.filesystem.is_dir(path) {
                self.filesystem.remove_dir_all(path)?;
            } else {
                self.filesystem.remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// What this run has put on disk so far.
#[derive(Debug, Default)]
struct Created {
    root: bool,
    /// Entries directly under the root, in creation order.
    top_level: Vec<PathBuf>,
}

impl Created {
    fn is_empty(&self) -> bool {
        !self.root && self.top_level.is_empty()
    }
}

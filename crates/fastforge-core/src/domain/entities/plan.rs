//! The generation plan: the fully resolved, ordered list of directories and
//! files to emit for one run.
//!
//! Directories are never declared; they are derived from file paths
//! (first-seen order, parents before children) and placed ahead of every
//! file. The emitter walks entries in order and never has to create a
//! parent on demand.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
    resolver::ResolvedFile,
    value_objects::FileRole,
};

/// A file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub role: FileRole,
    pub path: RelativePath,
    pub content: String,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    Directory(RelativePath),
    File(PlannedFile),
}

impl PlanEntry {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Directory(path) => path,
            Self::File(file) => &file.path,
        }
    }
}

/// Ordered, collision-free emission plan.
///
/// The `plan_id` exists for log correlation and reports; it plays no part
/// in equality of content.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    plan_id: Uuid,
    entries: Vec<PlanEntry>,
}

impl GenerationPlan {
    /// Order resolved files into a plan.
    ///
    /// # Errors
    /// `DuplicatePath` when two files resolve to the same path, or a file
    /// path is also needed as a directory.
    pub fn build(files: Vec<ResolvedFile>) -> Result<Self, DomainError> {
        let mut file_paths = HashSet::new();
        for file in &files {
            if !file_paths.insert(file.path.clone()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }

        let mut seen_dirs = HashSet::new();
        let mut entries = Vec::with_capacity(files.len() * 2);
        for file in &files {
            for dir in file.path.ancestors() {
                if file_paths.contains(&dir) {
                    return Err(DomainError::DuplicatePath {
                        path: dir.to_string(),
                    });
                }
                if seen_dirs.insert(dir.clone()) {
                    entries.push(PlanEntry::Directory(dir));
                }
            }
        }

        entries.extend(files.into_iter().map(|f| {
            PlanEntry::File(PlannedFile {
                role: f.role,
                path: f.path,
                content: f.content,
                permissions: f.permissions,
            })
        }));

        Ok(Self {
            plan_id: Uuid::new_v4(),
            entries,
        })
    }

    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn directories(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.iter().filter_map(|e| match e {
            PlanEntry::Directory(path) => Some(path),
            PlanEntry::File(_) => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &PlannedFile> {
        self.entries.iter().filter_map(|e| match e {
            PlanEntry::File(file) => Some(file),
            PlanEntry::Directory(_) => None,
        })
    }

    pub fn directory_count(&self) -> usize {
        self.directories().count()
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn file(&self, path: &str) -> Option<&PlannedFile> {
        self.files().find(|f| f.path.as_str() == path)
    }

    /// Re-check ordering and uniqueness.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidCatalog("generation plan is empty".into()));
        }

        let mut created = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();
            if let Some(parent) = path.ancestors().last() {
                if !created.contains(parent) {
                    return Err(DomainError::InvalidCatalog(format!(
                        "{path} is planned before its parent directory {parent}"
                    )));
                }
            }
            if !created.insert(path.clone()) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }
        }

        Ok(())
    }
}

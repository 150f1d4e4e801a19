use super::DomainError;
use std::fmt;
use std::path::Path;

/// A filesystem path guaranteed to stay inside the project root.
///
/// Invariant: never absolute, never contains `..`, never empty. Stored with
/// `/` separators so plans and error messages are identical on every
/// platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    #[cfg(test)]
    pub(crate) fn new(path: &str) -> Self {
        match Self::try_new(path) {
            Ok(p) => p,
            Err(e) => panic!("invalid RelativePath {path:?}: {e}"),
        }
    }

    /// Fallible constructor.
    ///
    /// `.` segments and repeated separators are dropped; `\` is treated as a
    /// separator.
    pub fn try_new(path: &str) -> Result<Self, DomainError> {
        let looks_absolute = path.starts_with('/')
            || path.starts_with('\\')
            || Path::new(path).is_absolute()
            || path.split(['/', '\\']).next().is_some_and(|s| s.ends_with(':'));
        if looks_absolute {
            return Err(DomainError::AbsolutePathNotAllowed { path: path.into() });
        }

        let mut segments = Vec::new();
        for segment in path.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => return Err(DomainError::PathTraversal { path: path.into() }),
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(DomainError::InvalidCatalog(format!(
                "empty relative path: {path:?}"
            )));
        }

        Ok(Self(segments.join("/")))
    }

    /// Every ancestor directory, outermost first (`a/b/c.txt` → `a`, `a/b`).
    pub fn ancestors(&self) -> Vec<RelativePath> {
        let segments: Vec<&str> = self.0.split('/').collect();
        (1..segments.len())
            .map(|n| Self(segments[..n].join("/")))
            .collect()
    }

    /// Whether the path names an entry directly under the root.
    pub fn is_top_level(&self) -> bool {
        !self.0.contains('/')
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability-based permissions model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

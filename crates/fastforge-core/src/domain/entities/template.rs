//! Template catalog aggregate and placeholder scanning.
//!
//! A [`TemplateCatalog`] is the declarative description of one complete
//! generated project for a database variant. It is a consistency boundary:
//! every invariant below is checked by [`TemplateCatalog::validate`] when the
//! catalog is built, so the resolver never sees a malformed catalog.
//!
//! ```text
//! TemplateCatalog (Aggregate Root)
//! ├── CatalogId         name@version
//! ├── DatabaseVariant   which backend this catalog targets
//! ├── CatalogMetadata   display information
//! └── Vec<TemplateFile>
//!      ├── FileRole
//!      ├── RelativePath
//!      ├── content template ({{TOKEN}} placeholders)
//!      ├── required placeholders (scanned, never declared by hand)
//!      └── pinned bindings (file-local overrides)
//! ```
//!
//! ## Placeholder syntax
//!
//! A placeholder is `{{` + an upper-case identifier + `}}`. Text that does
//! not have that shape (`${message}` in a Mako template, a single `{` in
//! Python) is never touched.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
    value_objects::{DatabaseVariant, FileRole},
};

// ============================================================================
// Placeholder
// ============================================================================

/// A named substitution point.
///
/// The set is closed: a template referencing any other `{{NAME}}` is
/// rejected when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placeholder {
    ProjectName,
    PackageName,
    DisplayTitle,
    AppPackage,
    DatabaseUrl,
    MigrationDatabaseUrl,
    DatabaseFile,
    MigrationsDir,
    ServerPort,
    PythonRequires,
    VenvDir,
    AppVersion,
}

impl Placeholder {
    pub const ALL: [Placeholder; 12] = [
        Self::ProjectName,
        Self::PackageName,
        Self::DisplayTitle,
        Self::AppPackage,
        Self::DatabaseUrl,
        Self::MigrationDatabaseUrl,
        Self::DatabaseFile,
        Self::MigrationsDir,
        Self::ServerPort,
        Self::PythonRequires,
        Self::VenvDir,
        Self::AppVersion,
    ];

    pub const fn token(&self) -> &'static str {
        match self {
            Self::ProjectName => "PROJECT_NAME",
            Self::PackageName => "PACKAGE_NAME",
            Self::DisplayTitle => "DISPLAY_TITLE",
            Self::AppPackage => "APP_PACKAGE",
            Self::DatabaseUrl => "DATABASE_URL",
            Self::MigrationDatabaseUrl => "MIGRATION_DATABASE_URL",
            Self::DatabaseFile => "DATABASE_FILE",
            Self::MigrationsDir => "MIGRATIONS_DIR",
            Self::ServerPort => "SERVER_PORT",
            Self::PythonRequires => "PYTHON_REQUIRES",
            Self::VenvDir => "VENV_DIR",
            Self::AppVersion => "APP_VERSION",
        }
    }

    /// The literal `{{TOKEN}}` form as it appears in a template.
    pub fn marker(&self) -> String {
        format!("{{{{{}}}}}", self.token())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Placeholder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|p| p.token() == s).ok_or(())
    }
}

/// One `{{TOKEN}}` occurrence: byte range of the whole marker plus the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub token: &'a str,
}

/// Iterate every placeholder-shaped marker in `text`, in order.
pub fn placeholder_spans(text: &str) -> impl Iterator<Item = TokenSpan<'_>> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text[cursor..].find("{{") {
            let start = cursor + offset;
            let inner_start = start + 2;
            let Some(close) = text[inner_start..].find("}}") else {
                cursor = text.len();
                return None;
            };
            let inner = &text[inner_start..inner_start + close];
            if is_token_shape(inner) {
                let end = inner_start + close + 2;
                cursor = end;
                return Some(TokenSpan {
                    start,
                    end,
                    token: inner,
                });
            }
            cursor = start + 1;
        }
        None
    })
}

fn is_token_shape(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Scan a template for the placeholders it references.
///
/// # Errors
/// The first marker whose token is not a known [`Placeholder`], returned as
/// the raw token text.
pub fn scan_placeholders(text: &str) -> Result<BTreeSet<Placeholder>, String> {
    let mut found = BTreeSet::new();
    for span in placeholder_spans(text) {
        let placeholder = Placeholder::from_str(span.token).map_err(|()| span.token.to_string())?;
        found.insert(placeholder);
    }
    Ok(found)
}

// ============================================================================
// TemplateFile
// ============================================================================

/// A declarative (path, parametrized content) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFile {
    role: FileRole,
    path: RelativePath,
    content_template: Cow<'static, str>,
    required_placeholders: BTreeSet<Placeholder>,
    pinned: BTreeMap<Placeholder, String>,
    permissions: Permissions,
}

impl TemplateFile {
    /// Build a template file, computing `required_placeholders` by scanning.
    ///
    /// # Errors
    /// - Path errors from [`RelativePath::try_new`]
    /// - `UnknownPlaceholder` for any `{{TOKEN}}` outside the known set
    pub fn try_new(
        role: FileRole,
        path: &str,
        content_template: impl Into<Cow<'static, str>>,
    ) -> Result<Self, DomainError> {
        let path = RelativePath::try_new(path)?;
        let content_template = content_template.into();
        let required_placeholders =
            scan_placeholders(&content_template).map_err(|token| DomainError::UnknownPlaceholder {
                path: path.to_string(),
                token,
            })?;

        Ok(Self {
            role,
            path,
            content_template,
            required_placeholders,
            pinned: BTreeMap::new(),
            permissions: Permissions::default(),
        })
    }

    /// Mark the emitted file executable.
    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }

    /// Bind `placeholder` to a literal for this file only.
    ///
    /// A pinned value wins over the shared context value; if it differs from
    /// what other files resolve, resolution fails.
    pub fn pin(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.pinned.insert(placeholder, value.into());
        self
    }

    pub const fn role(&self) -> FileRole {
        self.role
    }
    pub fn path(&self) -> &RelativePath {
        &self.path
    }
    pub fn content_template(&self) -> &str {
        &self.content_template
    }
    pub fn required_placeholders(&self) -> &BTreeSet<Placeholder> {
        &self.required_placeholders
    }
    pub fn pinned(&self, placeholder: Placeholder) -> Option<&str> {
        self.pinned.get(&placeholder).map(String::as_str)
    }
    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Re-scan the content and check the declared placeholder set still matches.
    pub fn validate(&self) -> Result<(), DomainError> {
        let scanned =
            scan_placeholders(&self.content_template).map_err(|token| {
                DomainError::UnknownPlaceholder {
                    path: self.path.to_string(),
                    token,
                }
            })?;

        if scanned != self.required_placeholders {
            return Err(DomainError::PlaceholderMismatch {
                path: self.path.to_string(),
                reason: "declared placeholders differ from the template text".into(),
            });
        }

        if let Some(unused) = self
            .pinned
            .keys()
            .find(|p| !self.required_placeholders.contains(p))
        {
            return Err(DomainError::PlaceholderMismatch {
                path: self.path.to_string(),
                reason: format!("pinned {} is not referenced", unused.marker()),
            });
        }

        Ok(())
    }
}

// ============================================================================
// CatalogId
// ============================================================================

/// Versioned catalog identifier, displayed as `name@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogId {
    name: String,
    version: String,
}

impl CatalogId {
    /// # Panics
    ///
    /// Panics if `name` contains `@`. Catalog ids are compiled in, so this
    /// is a programming error.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let version = version.into();
        assert!(!name.contains('@'), "Catalog name cannot contain @: {name}");
        Self { name, version }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

// ============================================================================
// CatalogMetadata
// ============================================================================

/// Human-readable catalog information for `fastforge list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMetadata {
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl CatalogMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            author: "FastForge".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// TemplateCatalog
// ============================================================================

/// The ordered file set that constitutes one complete project.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. id and display name are non-empty
/// 2. at least one file
/// 3. no two files share a path
/// 4. each role appears once, except roles that [`FileRole::allows_many`]
/// 5. each file's placeholder declaration matches its text
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCatalog {
    pub id: CatalogId,
    pub variant: DatabaseVariant,
    pub metadata: CatalogMetadata,
    files: Vec<TemplateFile>,
}

impl TemplateCatalog {
    pub fn builder() -> TemplateCatalogBuilder {
        TemplateCatalogBuilder::default()
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First file carrying `role`.
    pub fn file_for(&self, role: FileRole) -> Option<&TemplateFile> {
        self.files.iter().find(|f| f.role() == role)
    }

    /// Union of every placeholder referenced anywhere in the catalog.
    pub fn placeholders(&self) -> BTreeSet<Placeholder> {
        self.files
            .iter()
            .flat_map(|f| f.required_placeholders().iter().copied())
            .collect()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.name().is_empty() {
            return Err(DomainError::InvalidCatalog(
                "Catalog name cannot be empty".into(),
            ));
        }

        if self.metadata.name.is_empty() {
            return Err(DomainError::InvalidCatalog(
                "Metadata name cannot be empty".into(),
            ));
        }

        if self.files.is_empty() {
            return Err(DomainError::EmptyCatalog {
                catalog_id: self.id.to_string(),
            });
        }

        let mut paths = HashSet::new();
        let mut roles = HashSet::new();
        for file in &self.files {
            if !paths.insert(file.path().as_str()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path().to_string(),
                });
            }
            if !file.role().allows_many() && !roles.insert(file.role()) {
                return Err(DomainError::InvalidCatalog(format!(
                    "role '{}' appears more than once in {}",
                    file.role(),
                    self.id
                )));
            }
            file.validate()?;
        }

        Ok(())
    }
}

/// Builder for [`TemplateCatalog`]; `build()` runs full validation.
#[derive(Default)]
pub struct TemplateCatalogBuilder {
    id: Option<CatalogId>,
    variant: Option<DatabaseVariant>,
    metadata: Option<CatalogMetadata>,
    files: Vec<TemplateFile>,
}

impl TemplateCatalogBuilder {
    pub fn id(mut self, id: CatalogId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn variant(mut self, variant: DatabaseVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn metadata(mut self, metadata: CatalogMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn file(mut self, file: TemplateFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn files(mut self, files: impl IntoIterator<Item = TemplateFile>) -> Self {
        self.files.extend(files);
        self
    }

    /// # Errors
    ///
    /// - `MissingRequiredField` if id/variant/metadata not set
    /// - any violation reported by [`TemplateCatalog::validate`]
    pub fn build(self) -> Result<TemplateCatalog, DomainError> {
        let catalog = TemplateCatalog {
            id: self
                .id
                .ok_or(DomainError::MissingRequiredField { field: "id" })?,
            variant: self
                .variant
                .ok_or(DomainError::MissingRequiredField { field: "variant" })?,
            metadata: self
                .metadata
                .ok_or(DomainError::MissingRequiredField { field: "metadata" })?,
            files: self.files,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

//! Built-in template registry.
//!
//! The catalogs that ship with FastForge are compiled into the binary: their
//! text lives under `templates/` in this crate and is pulled in with
//! `include_str!`. Setup scripts are not stored as text; both are rendered
//! from the shared step list in `fastforge_core::domain::scripts`.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use fastforge_core::{
    application::{ApplicationError, ports::TemplateRegistry},
    domain::{
        CatalogId, CatalogMetadata, DatabaseVariant, DomainValidator, FileRole, ScriptSyntax,
        TemplateCatalog, TemplateFile, render_script,
    },
    error::ForgeResult,
};
use tracing::{debug, instrument};

/// Thread-safe registry of template catalogs, keyed by database variant.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    inner: Arc<RwLock<BTreeMap<DatabaseVariant, TemplateCatalog>>>,
}

impl BuiltinRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every catalog that ships with FastForge.
    #[instrument]
    pub fn with_builtin() -> ForgeResult<Self> {
        let registry = Self::new();
        registry.insert(sqlite_catalog()?)?;
        debug!(catalogs = registry.len(), "built-in catalogs loaded");
        Ok(registry)
    }

    /// Register a catalog, replacing any catalog for the same variant.
    pub fn insert(&self, catalog: TemplateCatalog) -> ForgeResult<()> {
        DomainValidator::validate_catalog(&catalog)?;

        let mut inner = self.inner.write().map_err(|_| ApplicationError::LockPoisoned {
            what: "template registry",
        })?;
        debug!(catalog = %catalog.id, variant = %catalog.variant, "registering catalog");
        inner.insert(catalog.variant, catalog);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateRegistry for BuiltinRegistry {
    fn lookup(&self, variant: DatabaseVariant) -> ForgeResult<TemplateCatalog> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned {
            what: "template registry",
        })?;

        inner.get(&variant).cloned().ok_or_else(|| {
            ApplicationError::TemplateResolution {
                reason: format!("no template catalog is registered for the {variant} variant"),
            }
            .into()
        })
    }

    fn list(&self) -> ForgeResult<Vec<TemplateCatalog>> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned {
            what: "template registry",
        })?;

        Ok(inner.values().cloned().collect())
    }
}

macro_rules! template {
    ($path:literal) => {
        include_str!(concat!("../../templates/sqlite/", $path))
    };
}

/// The FastAPI + SQLite + Alembic catalog.
///
/// File order here is the order files are written in.
pub fn sqlite_catalog() -> ForgeResult<TemplateCatalog> {
    let files = vec![
        TemplateFile::try_new(
            FileRole::Manifest,
            "pyproject.toml",
            template!("pyproject.toml.tmpl"),
        )?,
        TemplateFile::try_new(FileRole::EnvFile, ".env", template!("env.tmpl"))?,
        TemplateFile::try_new(
            FileRole::MigrationConfig,
            "alembic.ini",
            template!("alembic.ini.tmpl"),
        )?,
        TemplateFile::try_new(FileRole::Readme, "README.md", template!("README.md.tmpl"))?,
        TemplateFile::try_new(FileRole::PackageInit, "app/__init__.py", "")?,
        TemplateFile::try_new(FileRole::EntryPoint, "app/main.py", template!("app/main.py.tmpl"))?,
        TemplateFile::try_new(FileRole::PackageInit, "app/db/__init__.py", "")?,
        TemplateFile::try_new(
            FileRole::DeclarativeBase,
            "app/db/base.py",
            template!("app/db/base.py.tmpl"),
        )?,
        TemplateFile::try_new(
            FileRole::SessionModule,
            "app/db/session.py",
            template!("app/db/session.py.tmpl"),
        )?,
        TemplateFile::try_new(FileRole::PackageInit, "app/models/__init__.py", "")?,
        TemplateFile::try_new(
            FileRole::Models,
            "app/models/user.py",
            template!("app/models/user.py.tmpl"),
        )?,
        TemplateFile::try_new(FileRole::PackageInit, "app/schemas/__init__.py", "")?,
        TemplateFile::try_new(
            FileRole::Schemas,
            "app/schemas/user.py",
            template!("app/schemas/user.py.tmpl"),
        )?,
        TemplateFile::try_new(FileRole::PackageInit, "app/api/__init__.py", "")?,
        TemplateFile::try_new(FileRole::PackageInit, "app/api/v1/__init__.py", "")?,
        TemplateFile::try_new(
            FileRole::HomeRouter,
            "app/api/v1/home.py",
            template!("app/api/v1/home.py.tmpl"),
        )?,
        TemplateFile::try_new(
            FileRole::MigrationEnv,
            "alembic/env.py",
            template!("alembic/env.py.tmpl"),
        )?,
        TemplateFile::try_new(
            FileRole::MigrationScriptTemplate,
            "alembic/script.py.mako",
            template!("alembic/script.py.mako.tmpl"),
        )?,
        TemplateFile::try_new(FileRole::MigrationVersionsKeep, "alembic/versions/.gitkeep", "")?,
        TemplateFile::try_new(
            FileRole::PosixSetupScript,
            "setup.sh",
            render_script(ScriptSyntax::Posix),
        )?
        .executable(),
        TemplateFile::try_new(
            FileRole::WindowsSetupScript,
            "setup.bat",
            render_script(ScriptSyntax::Batch),
        )?,
    ];

    let catalog = TemplateCatalog::builder()
        .id(CatalogId::new("fastapi-sqlite", "1.0.0"))
        .variant(DatabaseVariant::Sqlite)
        .metadata(
            CatalogMetadata::new("FastAPI + SQLite + Alembic")
                .description(
                    "Async FastAPI service with SQLAlchemy 2.0, aiosqlite, Alembic \
                     migrations and cross-platform setup scripts",
                )
                .tags(vec![
                    "fastapi".into(),
                    "sqlite".into(),
                    "alembic".into(),
                    "async".into(),
                ]),
        )
        .files(files)
        .build()?;

    Ok(catalog)
}

//! Integration tests for fastforge-core: the pure pipeline from a raw name
//! to a plan, and emission through the `Filesystem` port.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use fastforge_core::{
    application::{ApplicationError, GenerateService, ports::TemplateRegistry},
    domain::{
        CatalogId, CatalogMetadata, ConsistencyResolver, FileRole, PlanEntry, ResolutionContext,
        ScriptSyntax, render_script,
    },
    prelude::*,
};

// ── Fixtures ────────────────────────────────────────────────────────────────

fn catalog() -> TemplateCatalog {
    TemplateCatalog::builder()
        .id(CatalogId::new("mini-sqlite", "0.1.0"))
        .variant(DatabaseVariant::Sqlite)
        .metadata(CatalogMetadata::new("Mini"))
        .file(
            TemplateFile::try_new(
                FileRole::Manifest,
                "pyproject.toml",
                "[project]\nname = \"{{PACKAGE_NAME}}\"\n",
            )
            .unwrap(),
        )
        .file(
            TemplateFile::try_new(FileRole::EnvFile, ".env", "DATABASE_URL=\"{{DATABASE_URL}}\"\n")
                .unwrap(),
        )
        .file(TemplateFile::try_new(FileRole::PackageInit, "app/__init__.py", "").unwrap())
        .file(
            TemplateFile::try_new(
                FileRole::SessionModule,
                "app/db/session.py",
                "URL = os.getenv(\"DATABASE_URL\", \"{{DATABASE_URL}}\")\n",
            )
            .unwrap(),
        )
        .file(
            TemplateFile::try_new(
                FileRole::PosixSetupScript,
                "setup.sh",
                render_script(ScriptSyntax::Posix),
            )
            .unwrap()
            .executable(),
        )
        .build()
        .unwrap()
}

struct FixedRegistry(TemplateCatalog);

impl TemplateRegistry for FixedRegistry {
    fn lookup(&self, variant: DatabaseVariant) -> ForgeResult<TemplateCatalog> {
        if variant == self.0.variant {
            Ok(self.0.clone())
        } else {
            Err(ApplicationError::TemplateResolution {
                reason: format!("no catalog for {variant}"),
            }
            .into())
        }
    }

    fn list(&self) -> ForgeResult<Vec<TemplateCatalog>> {
        Ok(vec![self.0.clone()])
    }
}

/// Records writes; only `/out` exists up front. Clones share state.
#[derive(Default, Clone)]
struct RecordingFs {
    state: Arc<Mutex<Recorded>>,
}

#[derive(Default)]
struct Recorded {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    executables: BTreeSet<PathBuf>,
}

impl RecordingFs {
    fn state(&self) -> MutexGuard<'_, Recorded> {
        self.state.lock().unwrap()
    }
}

impl Filesystem for RecordingFs {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state();
        path == Path::new("/out") || state.dirs.contains(path) || state.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path == Path::new("/out") || self.state().dirs.contains(path)
    }

    fn is_empty_dir(&self, path: &Path) -> ForgeResult<bool> {
        Ok(!self.state().files.keys().any(|p| p.starts_with(path)))
    }

    fn create_dir(&self, path: &Path) -> ForgeResult<()> {
        self.state().dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        self.create_dir(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        self.state()
            .files
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()> {
        if executable {
            self.state().executables.insert(path.to_path_buf());
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut state = self.state();
        state.dirs.retain(|p| !p.starts_with(path));
        state.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        self.state().files.remove(path);
        Ok(())
    }
}

// ── Pure pipeline ───────────────────────────────────────────────────────────

#[test]
fn raw_name_to_plan() {
    let spec = ProjectSpec::derive("  Blog API  ", DatabaseVariant::Sqlite).unwrap();
    assert_eq!(spec.sanitized_name(), "Blog_API");
    assert_eq!(spec.package_name(), "blog_api");

    let context = ResolutionContext::new(&spec, &GenerationSettings::default()).unwrap();
    let resolved = ConsistencyResolver::resolve(&catalog(), &context).unwrap();
    let plan = GenerationPlan::build(resolved).unwrap();

    let dirs: Vec<String> = plan.directories().map(ToString::to_string).collect();
    assert_eq!(dirs, ["app", "app/db"]);
    assert_eq!(plan.file_count(), 5);
    assert!(matches!(plan.entries()[0], PlanEntry::Directory(_)));

    let manifest = plan.file("pyproject.toml").unwrap();
    assert_eq!(manifest.content, "[project]\nname = \"blog_api\"\n");
}

#[test]
fn database_url_is_identical_across_files() {
    let spec = ProjectSpec::derive("shop", DatabaseVariant::Sqlite).unwrap();
    let settings = GenerationSettings {
        database_file: "shop.db".into(),
        ..GenerationSettings::default()
    };
    let context = ResolutionContext::new(&spec, &settings).unwrap();
    let plan = GenerationPlan::build(ConsistencyResolver::resolve(&catalog(), &context).unwrap())
        .unwrap();

    let url = "sqlite+aiosqlite:///./shop.db";
    assert!(plan.file(".env").unwrap().content.contains(url));
    assert!(plan.file("app/db/session.py").unwrap().content.contains(url));
}

#[test]
fn prepare_is_deterministic() {
    let service = GenerateService::new(
        Box::new(FixedRegistry(catalog())),
        Box::new(RecordingFs::default()),
    );
    let first = service.prepare("blog_api", DatabaseVariant::Sqlite).unwrap();
    let second = service.prepare("blog_api", DatabaseVariant::Sqlite).unwrap();

    assert_eq!(first.plan.entries(), second.plan.entries());
    assert_ne!(first.plan.plan_id(), second.plan.plan_id());
}

// ── Emission through the port ───────────────────────────────────────────────

#[test]
fn generate_writes_through_the_port() {
    let fs = RecordingFs::default();
    let service = GenerateService::new(Box::new(FixedRegistry(catalog())), Box::new(fs.clone()));
    let report = service
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new("/out"))
        .unwrap();

    assert_eq!(report.emission.root, PathBuf::from("/out/blog_api"));
    assert_eq!(report.files.len(), 5);
    assert_eq!(report.catalog_id.to_string(), "mini-sqlite@0.1.0");

    let state = fs.state();
    assert_eq!(state.files.len(), 5);
    assert!(state.files.contains_key(Path::new("/out/blog_api/app/db/session.py")));
    assert!(state.executables.contains(Path::new("/out/blog_api/setup.sh")));
}

#[test]
fn unsupported_variant_never_reaches_the_registry() {
    let service = GenerateService::new(
        Box::new(FixedRegistry(catalog())),
        Box::new(RecordingFs::default()),
    );
    let err = service
        .prepare("blog_api", DatabaseVariant::Postgres)
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::InvalidInput);
    assert!(
        err.suggestions()
            .iter()
            .any(|s| s.to_lowercase().contains("postgres"))
    );
}

#[test]
fn invalid_settings_are_a_configuration_error() {
    let service = GenerateService::new(
        Box::new(FixedRegistry(catalog())),
        Box::new(RecordingFs::default()),
    )
    .with_settings(GenerationSettings {
        server_port: 0,
        ..GenerationSettings::default()
    });

    let err = service
        .prepare("blog_api", DatabaseVariant::Sqlite)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

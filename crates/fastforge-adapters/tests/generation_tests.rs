//! End-to-end generation against the built-in catalog, on both the
//! in-memory and the local filesystem.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use fastforge_adapters::{BuiltinRegistry, LocalFilesystem, MemoryFilesystem};
use fastforge_core::{
    application::{
        ApplicationError, GenerateService,
        ports::{Filesystem, TemplateRegistry},
    },
    domain::{DatabaseVariant, DomainError, GenerationSettings, ScriptSyntax, parse_steps},
    error::{ErrorCategory, ForgeError, ForgeResult},
};
use tempfile::TempDir;
use walkdir::WalkDir;

const OUT: &str = "/out";

fn memory_service(fs: &MemoryFilesystem) -> GenerateService {
    GenerateService::new(
        Box::new(BuiltinRegistry::with_builtin().unwrap()),
        Box::new(fs.clone()),
    )
}

/// `LocalFilesystem` that fails its `n`th `write_file` call.
struct FlakyLocal {
    inner: LocalFilesystem,
    writes: AtomicUsize,
    fail_on: usize,
}

impl FlakyLocal {
    fn failing_on(fail_on: usize) -> Self {
        Self {
            inner: LocalFilesystem::new(),
            writes: AtomicUsize::new(0),
            fail_on,
        }
    }
}

impl Filesystem for FlakyLocal {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }
    fn is_empty_dir(&self, path: &Path) -> ForgeResult<bool> {
        self.inner.is_empty_dir(path)
    }
    fn create_dir(&self, path: &Path) -> ForgeResult<()> {
        self.inner.create_dir(path)
    }
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        self.inner.create_dir_all(path)
    }
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        if self.writes.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                operation: "write",
                reason: "injected failure".into(),
            }
            .into());
        }
        self.inner.write_file(path, content)
    }
    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()> {
        self.inner.set_permissions(path, executable)
    }
    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        self.inner.remove_dir_all(path)
    }
    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        self.inner.remove_file(path)
    }
}

fn flaky_service(fail_on: usize) -> GenerateService {
    GenerateService::new(
        Box::new(BuiltinRegistry::with_builtin().unwrap()),
        Box::new(FlakyLocal::failing_on(fail_on)),
    )
}

fn entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

fn catalog_paths() -> BTreeSet<String> {
    BuiltinRegistry::with_builtin()
        .unwrap()
        .lookup(DatabaseVariant::Sqlite)
        .unwrap()
        .files()
        .iter()
        .map(|f| f.path().to_string())
        .collect()
}

fn quoted_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let start = text.find(key)? + key.len();
    let rest = &text[start..];
    let open = rest.find('"')? + 1;
    let close = rest[open..].find('"')? + open;
    Some(&rest[open..close])
}

#[test]
fn blog_api_end_to_end() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    let report = memory_service(&fs)
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();

    assert_eq!(report.emission.root, PathBuf::from("/out/blog_api"));
    assert_eq!(report.catalog_id.to_string(), "fastapi-sqlite@1.0.0");
    assert_eq!(
        fs.read_file("/out/blog_api/.env").as_deref(),
        Some("DATABASE_URL=\"sqlite+aiosqlite:///./app.db\"\nDB_ECHO=\"false\"\n")
    );

    let ini = fs.read_file("/out/blog_api/alembic.ini").unwrap();
    assert!(ini.contains("script_location = alembic\n"));
    assert!(ini.contains("sqlalchemy.url = sqlite:///./app.db\n"));

    let main = fs.read_file("/out/blog_api/app/main.py").unwrap();
    assert!(main.contains("title=\"Blog Api\""));
    assert!(main.contains("from app.api.v1.home import router"));

    let manifest = fs.read_file("/out/blog_api/pyproject.toml").unwrap();
    assert!(manifest.contains("name = \"blog_api\""));
    assert!(manifest.contains("include = [\"app*\"]"));
}

#[test]
fn generated_tree_matches_catalog_exactly() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    memory_service(&fs)
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();

    let written: BTreeSet<String> = fs
        .list_files()
        .into_iter()
        .map(|p| {
            p.strip_prefix("/out/blog_api")
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(written, catalog_paths());
}

#[test]
fn no_placeholder_markers_survive() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    memory_service(&fs)
        .generate("Inventory-Service", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();

    for (path, content) in fs.snapshot() {
        assert!(
            !content.contains("{{"),
            "{} still holds a placeholder",
            path.display()
        );
    }
}

#[test]
fn env_and_session_agree_on_database_url() {
    let settings = GenerationSettings {
        database_file: "inventory.db".into(),
        ..GenerationSettings::default()
    };
    let fs = MemoryFilesystem::new().with_dir(OUT);
    memory_service(&fs)
        .with_settings(settings)
        .generate("inventory", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();

    let env = fs.read_file("/out/inventory/.env").unwrap();
    let session = fs.read_file("/out/inventory/app/db/session.py").unwrap();

    let from_env = quoted_value(&env, "DATABASE_URL=").unwrap();
    let from_session = quoted_value(&session, "os.getenv(\"DATABASE_URL\",").unwrap();
    assert_eq!(from_env, "sqlite+aiosqlite:///./inventory.db");
    assert_eq!(from_env, from_session);
}

#[test]
fn setup_scripts_run_the_same_steps() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    memory_service(&fs)
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();

    let sh = fs.read_file("/out/blog_api/setup.sh").unwrap();
    let bat = fs.read_file("/out/blog_api/setup.bat").unwrap();
    assert_eq!(
        parse_steps(&sh, ScriptSyntax::Posix),
        parse_steps(&bat, ScriptSyntax::Batch)
    );
    assert!(sh.contains("uvicorn app.main:app --reload --port 8000"));
    assert!(bat.contains("uvicorn app.main:app --reload --port 8000"));
    assert!(fs.is_executable("/out/blog_api/setup.sh"));
    assert!(!fs.is_executable("/out/blog_api/setup.bat"));
}

#[test]
fn second_run_is_a_conflict_and_changes_nothing() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    let service = memory_service(&fs);
    service
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();
    let before = fs.snapshot();

    let err = service
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Application(ApplicationError::DirectoryExists { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::Conflict);
    assert_eq!(fs.snapshot(), before);
}

#[test]
fn empty_name_writes_nothing() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    let err = memory_service(&fs)
        .generate("", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap_err();

    assert!(matches!(
        err,
        ForgeError::Domain(DomainError::InvalidProjectName { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::InvalidInput);
    assert!(fs.list_files().is_empty());
    assert_eq!(fs.write_count(), 0);
}

#[test]
fn separators_never_escape_the_output_dir() {
    let fs = MemoryFilesystem::new().with_dir(OUT);
    let report = memory_service(&fs)
        .generate("blog/api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap();

    assert_eq!(report.emission.root, PathBuf::from("/out/blog_api"));
    assert!(fs.list_files().iter().all(|p| p.starts_with("/out/blog_api")));
}

#[test]
fn unsupported_variants_write_nothing() {
    for variant in [DatabaseVariant::Postgres, DatabaseVariant::Mongo] {
        let fs = MemoryFilesystem::new().with_dir(OUT);
        let err = memory_service(&fs)
            .generate("blog_api", variant, Path::new(OUT))
            .unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Domain(DomainError::UnsupportedVariant { .. })
        ));
        assert!(!err.suggestions().is_empty());
        assert_eq!(fs.write_count(), 0);
    }
}

#[test]
fn failure_at_any_write_leaves_no_trace() {
    let total = catalog_paths().len();
    for n in 1..=total {
        let fs = MemoryFilesystem::new().with_dir(OUT).fail_on_write(n);
        let err = memory_service(&fs)
            .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Io, "write #{n}");
        assert!(err.was_rolled_back(), "write #{n}");
        assert!(fs.list_files().is_empty(), "write #{n} left files behind");
        assert!(!fs.exists(Path::new("/out/blog_api")), "write #{n}");
    }
}

#[test]
fn failure_inside_a_reused_empty_root_restores_it() {
    let fs = MemoryFilesystem::new()
        .with_dir("/out/blog_api")
        .fail_on_write(5);
    let err = memory_service(&fs)
        .generate("blog_api", DatabaseVariant::Sqlite, Path::new(OUT))
        .unwrap_err();

    assert!(err.was_rolled_back());
    assert!(fs.list_files().is_empty());
    assert!(fs.is_empty_dir(Path::new("/out/blog_api")).unwrap());
}

#[test]
fn local_filesystem_tree_matches_catalog() {
    let tmp = TempDir::new().unwrap();
    let service = GenerateService::new(
        Box::new(BuiltinRegistry::with_builtin().unwrap()),
        Box::new(LocalFilesystem::new()),
    );
    let report = service
        .generate("blog_api", DatabaseVariant::Sqlite, tmp.path())
        .unwrap();

    let root = tmp.path().join("blog_api");
    assert_eq!(report.emission.root, root);

    let written: BTreeSet<String> = WalkDir::new(&root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(&root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(written, catalog_paths());

    let env = std::fs::read_to_string(root.join(".env")).unwrap();
    assert!(env.starts_with("DATABASE_URL=\"sqlite+aiosqlite:///./app.db\"\n"));
}

#[cfg(unix)]
#[test]
fn local_setup_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let service = GenerateService::new(
        Box::new(BuiltinRegistry::with_builtin().unwrap()),
        Box::new(LocalFilesystem::new()),
    );
    service
        .generate("blog_api", DatabaseVariant::Sqlite, tmp.path())
        .unwrap();

    let mode = std::fs::metadata(tmp.path().join("blog_api/setup.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn local_failure_in_a_reused_root_empties_it_in_place() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("blog_api");
    std::fs::create_dir(&root).unwrap();

    let err = flaky_service(5)
        .generate("blog_api", DatabaseVariant::Sqlite, tmp.path())
        .unwrap_err();

    assert!(err.was_rolled_back());
    assert!(root.is_dir());
    assert!(entries(&root).is_empty());
}

#[cfg(unix)]
#[test]
fn local_rollback_keeps_the_mode_of_a_reused_root() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("blog_api");
    std::fs::create_dir(&root).unwrap();
    std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o700)).unwrap();

    flaky_service(5)
        .generate("blog_api", DatabaseVariant::Sqlite, tmp.path())
        .unwrap_err();

    let mode = std::fs::metadata(&root).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
    assert!(entries(&root).is_empty());
}

#[cfg(unix)]
#[test]
fn local_rollback_through_a_symlinked_root_cleans_the_target() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("real");
    std::fs::create_dir(&target).unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();
    let link = out.join("blog_api");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let err = flaky_service(5)
        .generate("blog_api", DatabaseVariant::Sqlite, &out)
        .unwrap_err();

    assert!(err.was_rolled_back());
    assert!(entries(&target).is_empty());
    assert!(
        std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[test]
fn missing_output_dir_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does/not/exist");
    let service = GenerateService::new(
        Box::new(BuiltinRegistry::with_builtin().unwrap()),
        Box::new(LocalFilesystem::new()),
    );
    let err = service
        .generate("blog_api", DatabaseVariant::Sqlite, &missing)
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Io);
    assert!(!err.was_rolled_back());
    assert!(!tmp.path().join("does").exists());
}

//! Placeholder binding and the cross-file consistency check.
//!
//! Resolution is a single pure pass over the catalog. For each file every
//! required placeholder is bound (file-local pin first, then the shared
//! context), substituted, and recorded. A placeholder that resolves to a
//! different value in two files fails the whole pass with
//! `InconsistentValue`; nothing has been written at that point.

use std::collections::BTreeMap;

use crate::domain::{
    capabilities::{database_urls, select_variant},
    entities::{
        common::{Permissions, RelativePath},
        project_spec::ProjectSpec,
        template::{Placeholder, TemplateCatalog, TemplateFile, placeholder_spans},
    },
    error::DomainError,
    settings::{APP_PACKAGE, GenerationSettings, MIGRATIONS_DIR},
    value_objects::FileRole,
};

/// Shared bindings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    bindings: BTreeMap<Placeholder, String>,
}

impl ResolutionContext {
    /// Bind every placeholder from the project spec and shared settings.
    ///
    /// # Errors
    /// `UnsupportedVariant` for variants without SQLAlchemy drivers.
    pub fn new(spec: &ProjectSpec, settings: &GenerationSettings) -> Result<Self, DomainError> {
        let variant = select_variant(spec.database_variant())?;
        let (runtime_url, migration_url) = database_urls(variant, &settings.database_file)
            .ok_or_else(|| DomainError::UnsupportedVariant {
                variant: variant.to_string(),
                manual_steps: Vec::new(),
            })?;

        Ok(Self::default()
            .with(Placeholder::ProjectName, spec.sanitized_name())
            .with(Placeholder::PackageName, spec.package_name())
            .with(Placeholder::DisplayTitle, spec.display_title())
            .with(Placeholder::AppPackage, APP_PACKAGE)
            .with(Placeholder::DatabaseUrl, runtime_url)
            .with(Placeholder::MigrationDatabaseUrl, migration_url)
            .with(Placeholder::DatabaseFile, &settings.database_file)
            .with(Placeholder::MigrationsDir, MIGRATIONS_DIR)
            .with(Placeholder::ServerPort, settings.server_port.to_string())
            .with(Placeholder::PythonRequires, &settings.python_requires)
            .with(Placeholder::VenvDir, &settings.venv_dir)
            .with(Placeholder::AppVersion, &settings.app_version))
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.bindings.insert(placeholder, value.into());
        self
    }

    #[cfg(test)]
    fn without(mut self, placeholder: Placeholder) -> Self {
        self.bindings.remove(&placeholder);
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.bindings.get(&placeholder).map(String::as_str)
    }

    pub fn bindings(&self) -> &BTreeMap<Placeholder, String> {
        &self.bindings
    }
}

/// A template file with all placeholders substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub role: FileRole,
    pub path: RelativePath,
    pub content: String,
    pub permissions: Permissions,
}

pub struct ConsistencyResolver;

impl ConsistencyResolver {
    /// Resolve every file in `catalog`, in catalog order.
    ///
    /// # Errors
    /// - `UnresolvedPlaceholder`: no pinned or shared binding, or a marker
    ///   survived substitution
    /// - `InconsistentValue`: two files bind the same placeholder differently
    pub fn resolve(
        catalog: &TemplateCatalog,
        context: &ResolutionContext,
    ) -> Result<Vec<ResolvedFile>, DomainError> {
        // placeholder -> (first file that bound it, value)
        let mut first_seen: BTreeMap<Placeholder, (&RelativePath, &str)> = BTreeMap::new();
        let mut resolved = Vec::with_capacity(catalog.len());

        for file in catalog.files() {
            let values = Self::bind(file, context)?;

            for (&placeholder, &value) in &values {
                match first_seen.get(&placeholder) {
                    Some(&(first_path, first_value)) if first_value != value => {
                        return Err(DomainError::InconsistentValue {
                            token: placeholder.token().to_string(),
                            first_path: first_path.to_string(),
                            first_value: first_value.to_string(),
                            second_path: file.path().to_string(),
                            second_value: value.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        first_seen.insert(placeholder, (file.path(), value));
                    }
                }
            }

            let content = substitute(file.content_template(), &values);
            if let Some(left) = placeholder_spans(&content).next() {
                return Err(DomainError::UnresolvedPlaceholder {
                    path: file.path().to_string(),
                    token: left.token.to_string(),
                });
            }

            resolved.push(ResolvedFile {
                role: file.role(),
                path: file.path().clone(),
                content,
                permissions: file.permissions(),
            });
        }

        Ok(resolved)
    }

    fn bind<'a>(
        file: &'a TemplateFile,
        context: &'a ResolutionContext,
    ) -> Result<BTreeMap<Placeholder, &'a str>, DomainError> {
        file.required_placeholders()
            .iter()
            .map(|&placeholder| {
                file.pinned(placeholder)
                    .or_else(|| context.get(placeholder))
                    .map(|value| (placeholder, value))
                    .ok_or_else(|| DomainError::UnresolvedPlaceholder {
                        path: file.path().to_string(),
                        token: placeholder.token().to_string(),
                    })
            })
            .collect()
    }
}

/// Replace every known marker in one left-to-right pass; substituted text
/// is never rescanned.
fn substitute(template: &str, values: &BTreeMap<Placeholder, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for span in placeholder_spans(template) {
        let value = span
            .token
            .parse::<Placeholder>()
            .ok()
            .and_then(|p| values.get(&p));
        if let Some(value) = value {
            out.push_str(&template[last..span.start]);
            out.push_str(value);
            last = span.end;
        }
    }
    out.push_str(&template[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::template::{CatalogId, CatalogMetadata},
        value_objects::DatabaseVariant,
    };

    fn spec(name: &str) -> ProjectSpec {
        ProjectSpec::derive(name, DatabaseVariant::Sqlite).unwrap()
    }

    fn context() -> ResolutionContext {
        ResolutionContext::new(&spec("blog_api"), &GenerationSettings::default()).unwrap()
    }

    fn catalog(files: Vec<TemplateFile>) -> TemplateCatalog {
        TemplateCatalog::builder()
            .id(CatalogId::new("test", "1.0.0"))
            .variant(DatabaseVariant::Sqlite)
            .metadata(CatalogMetadata::new("Test"))
            .files(files)
            .build()
            .unwrap()
    }

    fn env_and_session() -> Vec<TemplateFile> {
        vec![
            TemplateFile::try_new(FileRole::EnvFile, ".env", "DATABASE_URL=\"{{DATABASE_URL}}\"\n")
                .unwrap(),
            TemplateFile::try_new(
                FileRole::SessionModule,
                "app/db/session.py",
                "URL = os.getenv(\"DATABASE_URL\", \"{{DATABASE_URL}}\")\n",
            )
            .unwrap(),
        ]
    }

    #[test]
    fn context_binds_every_placeholder() {
        let ctx = context();
        for p in Placeholder::ALL {
            assert!(ctx.get(p).is_some(), "{p} is unbound");
        }
        assert_eq!(
            ctx.get(Placeholder::DatabaseUrl),
            Some("sqlite+aiosqlite:///./app.db")
        );
        assert_eq!(
            ctx.get(Placeholder::MigrationDatabaseUrl),
            Some("sqlite:///./app.db")
        );
        assert_eq!(ctx.get(Placeholder::PackageName), Some("blog_api"));
        assert_eq!(ctx.get(Placeholder::AppPackage), Some("app"));
        assert_eq!(ctx.get(Placeholder::ServerPort), Some("8000"));
    }

    #[test]
    fn context_follows_settings() {
        let settings = GenerationSettings {
            database_file: "blog.db".into(),
            server_port: 9000,
            ..Default::default()
        };
        let ctx = ResolutionContext::new(&spec("blog_api"), &settings).unwrap();
        assert_eq!(
            ctx.get(Placeholder::DatabaseUrl),
            Some("sqlite+aiosqlite:///./blog.db")
        );
        assert_eq!(ctx.get(Placeholder::ServerPort), Some("9000"));
    }

    #[test]
    fn context_rejects_manual_only_variant() {
        let spec = ProjectSpec::derive("blog_api", DatabaseVariant::Postgres).unwrap();
        assert!(matches!(
            ResolutionContext::new(&spec, &GenerationSettings::default()),
            Err(DomainError::UnsupportedVariant { .. })
        ));
    }

    #[test]
    fn shared_url_is_identical_in_env_and_session() {
        let files = ConsistencyResolver::resolve(&catalog(env_and_session()), &context()).unwrap();
        assert_eq!(
            files[0].content,
            "DATABASE_URL=\"sqlite+aiosqlite:///./app.db\"\n"
        );
        assert!(files[1].content.contains("\"sqlite+aiosqlite:///./app.db\")"));
    }

    #[test]
    fn drifting_pin_is_caught() {
        let mut files = env_and_session();
        files[1] = files[1]
            .clone()
            .pin(Placeholder::DatabaseUrl, "sqlite+aiosqlite:///./other.db");

        let err = ConsistencyResolver::resolve(&catalog(files), &context()).unwrap_err();
        match err {
            DomainError::InconsistentValue {
                token,
                first_path,
                second_path,
                ..
            } => {
                assert_eq!(token, "DATABASE_URL");
                assert_eq!(first_path, ".env");
                assert_eq!(second_path, "app/db/session.py");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn matching_pin_is_accepted() {
        let mut files = env_and_session();
        files[0] = files[0]
            .clone()
            .pin(Placeholder::DatabaseUrl, "sqlite+aiosqlite:///./app.db");
        assert!(ConsistencyResolver::resolve(&catalog(files), &context()).is_ok());
    }

    #[test]
    fn missing_binding_is_unresolved() {
        let ctx = context().without(Placeholder::DatabaseUrl);
        let err = ConsistencyResolver::resolve(&catalog(env_and_session()), &ctx).unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnresolvedPlaceholder { path, token } if path == ".env" && token == "DATABASE_URL"
        ));
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let ctx = context().with(Placeholder::DisplayTitle, "{{PROJECT_NAME}}");
        let file =
            TemplateFile::try_new(FileRole::Readme, "README.md", "# {{DISPLAY_TITLE}}").unwrap();
        let err = ConsistencyResolver::resolve(&catalog(vec![file]), &ctx).unwrap_err();
        assert!(matches!(err, DomainError::UnresolvedPlaceholder { .. }));
    }

    #[test]
    fn resolution_preserves_order_and_permissions() {
        let files = vec![
            TemplateFile::try_new(FileRole::Readme, "README.md", "{{PROJECT_NAME}}").unwrap(),
            TemplateFile::try_new(FileRole::PosixSetupScript, "setup.sh", "{{VENV_DIR}}")
                .unwrap()
                .executable(),
        ];
        let resolved = ConsistencyResolver::resolve(&catalog(files), &context()).unwrap();
        assert_eq!(resolved[0].content, "blog_api");
        assert_eq!(resolved[1].content, ".venv");
        assert!(resolved[1].permissions.executable_flag());
    }

    #[test]
    fn substitute_keeps_unbound_markers_in_place() {
        let mut values = BTreeMap::new();
        values.insert(Placeholder::ProjectName, "x");
        assert_eq!(
            substitute("{{PROJECT_NAME}}-{{VENV_DIR}}", &values),
            "x-{{VENV_DIR}}"
        );
    }
}

//! The `ProjectSpec` value and identifier derivation.
//!
//! A `ProjectSpec` is built once per invocation from the raw CLI argument and
//! is immutable afterwards. Every identifier that appears in a generated file
//! (directory name, importable package name, display title) is derived here
//! and nowhere else.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::fmt;

use crate::domain::{error::DomainError, value_objects::DatabaseVariant};

/// Package names that collide with modules inside the generated tree or that
/// cannot be imported.
const RESERVED_PACKAGES: &[&str] = &["app", "alembic", "venv", "test", "tests"];

const PYTHON_KEYWORDS: &[&str] = &[
    "false", "none", "true", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Names Windows refuses as a file or directory name, whatever the extension.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validated identifiers for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    raw_name: String,
    sanitized_name: String,
    package_name: String,
    display_title: String,
    database_variant: DatabaseVariant,
}

impl ProjectSpec {
    /// Derive a spec from the raw project-name argument.
    ///
    /// # Errors
    /// `InvalidProjectName` when nothing usable remains after sanitizing,
    /// `ReservedProjectName` when the package name is reserved.
    pub fn derive(raw_name: &str, database_variant: DatabaseVariant) -> Result<Self, DomainError> {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidProjectName {
                name: raw_name.into(),
                reason: "name is empty".into(),
            });
        }

        let sanitized_name = sanitize(trimmed);
        if sanitized_name.is_empty() {
            return Err(DomainError::InvalidProjectName {
                name: raw_name.into(),
                reason: "name has no letters or digits".into(),
            });
        }

        let package_name = to_package_name(&sanitized_name);
        if RESERVED_PACKAGES.contains(&package_name.as_str())
            || PYTHON_KEYWORDS.contains(&package_name.as_str())
        {
            return Err(DomainError::ReservedProjectName {
                name: raw_name.into(),
                package: package_name,
            });
        }

        let display_title = to_display_title(&sanitized_name);

        Ok(Self {
            raw_name: raw_name.into(),
            sanitized_name,
            package_name,
            display_title,
            database_variant,
        })
    }

    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }
    /// Directory name of the project root.
    pub fn sanitized_name(&self) -> &str {
        &self.sanitized_name
    }
    /// Importable, lower-case package token.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }
    pub fn display_title(&self) -> &str {
        &self.display_title
    }
    pub const fn database_variant(&self) -> DatabaseVariant {
        self.database_variant
    }
}

impl fmt::Display for ProjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (package {}, {})",
            self.sanitized_name, self.package_name, self.database_variant
        )
    }
}

// ============================================================================
// Derivation helpers
// ============================================================================

/// Replace anything outside `[A-Za-z0-9_-]` with `_`, collapse `_` runs, and
/// strip separators from both ends.
fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let mut trimmed = out.trim_matches(|c| c == '_' || c == '-').to_string();

    if WINDOWS_DEVICE_NAMES.contains(&trimmed.to_ascii_lowercase().as_str()) {
        trimmed.push('_');
    }
    trimmed
}

fn to_package_name(sanitized: &str) -> String {
    let mut name = sanitized.to_ascii_lowercase().replace('-', "_");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// `blog_api` → `Blog Api`, `BlogAPI` → `Blog Api`.
fn to_display_title(sanitized: &str) -> String {
    split_words(sanitized)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a string into lower-case words on `_`, `-`, camelCase transitions,
/// and acronym boundaries (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(raw: &str) -> Result<ProjectSpec, DomainError> {
        ProjectSpec::derive(raw, DatabaseVariant::Sqlite)
    }

    #[test]
    fn plain_name_passes_through() {
        let spec = derive("blog_api").unwrap();
        assert_eq!(spec.sanitized_name(), "blog_api");
        assert_eq!(spec.package_name(), "blog_api");
        assert_eq!(spec.display_title(), "Blog Api");
        assert_eq!(spec.database_variant(), DatabaseVariant::Sqlite);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let spec = derive("  blog_api \t").unwrap();
        assert_eq!(spec.sanitized_name(), "blog_api");
        assert_eq!(spec.raw_name(), "  blog_api \t");
    }

    #[test]
    fn empty_and_whitespace_are_rejected() {
        for raw in ["", "   ", "\n\t"] {
            assert!(matches!(
                derive(raw),
                Err(DomainError::InvalidProjectName { .. })
            ));
        }
    }

    #[test]
    fn only_symbols_is_rejected() {
        assert!(matches!(
            derive("///"),
            Err(DomainError::InvalidProjectName { .. })
        ));
        assert!(matches!(
            derive("..."),
            Err(DomainError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn path_separators_become_a_single_segment() {
        let spec = derive("blog/api").unwrap();
        assert_eq!(spec.sanitized_name(), "blog_api");
        let spec = derive("..\\blog\\api").unwrap();
        assert_eq!(spec.sanitized_name(), "blog_api");
        assert!(!spec.sanitized_name().contains(['/', '\\']));
    }

    #[test]
    fn unsafe_characters_collapse() {
        let spec = derive("my  shop: v2?").unwrap();
        assert_eq!(spec.sanitized_name(), "my_shop_v2");
    }

    #[test]
    fn hyphens_kept_in_directory_but_not_package() {
        let spec = derive("Inventory-Service").unwrap();
        assert_eq!(spec.sanitized_name(), "Inventory-Service");
        assert_eq!(spec.package_name(), "inventory_service");
        assert_eq!(spec.display_title(), "Inventory Service");
    }

    #[test]
    fn leading_digit_gets_importable_prefix() {
        let spec = derive("2048game").unwrap();
        assert_eq!(spec.sanitized_name(), "2048game");
        assert_eq!(spec.package_name(), "_2048game");
    }

    #[test]
    fn reserved_names_are_rejected() {
        for raw in ["app", "APP", " app ", "alembic", "tests", "class"] {
            assert!(
                matches!(derive(raw), Err(DomainError::ReservedProjectName { .. })),
                "expected {raw:?} to be reserved"
            );
        }
    }

    #[test]
    fn names_containing_reserved_words_are_fine() {
        assert!(derive("app_service").is_ok());
        assert!(derive("my_app").is_ok());
    }

    #[test]
    fn windows_device_names_are_suffixed() {
        let spec = derive("con").unwrap();
        assert_eq!(spec.sanitized_name(), "con_");
        assert_eq!(spec.package_name(), "con_");
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(derive("Blog API").unwrap(), derive("Blog API").unwrap());
    }

    #[test]
    fn camel_case_title() {
        assert_eq!(derive("BlogAPIServer").unwrap().display_title(), "Blog Api Server");
    }
}

//! Setup script generation.
//!
//! Both setup scripts are rendered from [`SetupStep::ORDERED`]. A step is
//! described once, as data, and rendered into each syntax; adding a step to
//! the list adds it, in position, to both scripts.
//!
//! Every rendered step starts with a marker line (`# step: <slug>` for the
//! POSIX shell, `REM step: <slug>` for batch). [`parse_steps`] reads the
//! markers back so parity between the two scripts can be checked on the
//! generated text itself.
//!
//! Rendered scripts are templates: they reference `{{VENV_DIR}}`,
//! `{{MIGRATIONS_DIR}}`, `{{APP_PACKAGE}}`, `{{SERVER_PORT}}` and
//! `{{DISPLAY_TITLE}}`, which the resolver binds like any other file.

use std::fmt;

/// One abstract setup operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStep {
    EnvironmentSetup,
    DependencyInstall,
    MigrationInit,
    MigrationGenerate,
    MigrationApply,
    ServerStart,
}

impl SetupStep {
    /// The canonical order both scripts follow.
    pub const ORDERED: [SetupStep; 6] = [
        Self::EnvironmentSetup,
        Self::DependencyInstall,
        Self::MigrationInit,
        Self::MigrationGenerate,
        Self::MigrationApply,
        Self::ServerStart,
    ];

    pub const fn slug(&self) -> &'static str {
        match self {
            Self::EnvironmentSetup => "environment-setup",
            Self::DependencyInstall => "dependency-install",
            Self::MigrationInit => "migration-init",
            Self::MigrationGenerate => "migration-generate",
            Self::MigrationApply => "migration-apply",
            Self::ServerStart => "server-start",
        }
    }

    /// Progress text echoed by the script.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EnvironmentSetup => "Creating and activating virtual environment",
            Self::DependencyInstall => "Installing dependencies",
            Self::MigrationInit => "Initializing migrations",
            Self::MigrationGenerate => "Generating initial migration",
            Self::MigrationApply => "Applying migrations",
            Self::ServerStart => "Starting development server",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ORDERED.into_iter().find(|s| s.slug() == slug)
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSyntax {
    /// `setup.sh`
    Posix,
    /// `setup.bat`
    Batch,
}

impl ScriptSyntax {
    const fn marker_prefix(&self) -> &'static str {
        match self {
            Self::Posix => "# step: ",
            Self::Batch => "REM step: ",
        }
    }

    const fn newline(&self) -> &'static str {
        match self {
            Self::Posix => "\n",
            Self::Batch => "\r\n",
        }
    }
}

/// Render a setup script template for `syntax`.
pub fn render_script(syntax: ScriptSyntax) -> String {
    let mut lines: Vec<String> = header(syntax).iter().map(|l| l.to_string()).collect();
    let total = SetupStep::ORDERED.len();

    for (index, step) in SetupStep::ORDERED.into_iter().enumerate() {
        lines.push(format!("{}{}", syntax.marker_prefix(), step.slug()));
        lines.push(match syntax {
            ScriptSyntax::Posix => {
                format!("echo \"[{}/{total}] {}...\"", index + 1, step.label())
            }
            ScriptSyntax::Batch => format!("echo [{}/{total}] {}...", index + 1, step.label()),
        });
        lines.extend(step_body(step, syntax).iter().map(|l| l.to_string()));
        lines.push(String::new());
    }

    lines.extend(footer(syntax).iter().map(|l| l.to_string()));

    let newline = syntax.newline();
    let mut out = lines.join(newline);
    out.push_str(newline);
    out
}

/// Ordered steps found in a rendered script, by marker.
///
/// Markers with an unknown slug are skipped.
pub fn parse_steps(script: &str, syntax: ScriptSyntax) -> Vec<SetupStep> {
    let prefix = syntax.marker_prefix();
    script
        .lines()
        .filter_map(|line| line.trim().strip_prefix(prefix))
        .filter_map(|slug| SetupStep::from_slug(slug.trim()))
        .collect()
}

fn header(syntax: ScriptSyntax) -> &'static [&'static str] {
    match syntax {
        ScriptSyntax::Posix => &[
            "#!/usr/bin/env bash",
            "# Setup script for {{DISPLAY_TITLE}}",
            "set -e",
            "",
            "cd \"$(dirname \"$0\")\"",
            "",
        ],
        ScriptSyntax::Batch => &[
            "@echo off",
            "REM Setup script for {{DISPLAY_TITLE}}",
            "setlocal",
            "",
            "cd /d \"%~dp0\"",
            "",
        ],
    }
}

fn footer(syntax: ScriptSyntax) -> &'static [&'static str] {
    match syntax {
        ScriptSyntax::Posix => &[],
        ScriptSyntax::Batch => &[
            "endlocal",
            "exit /b 0",
            "",
            ":error",
            "echo Setup failed with exit code %errorlevel%.",
            "endlocal",
            "exit /b 1",
        ],
    }
}

fn step_body(step: SetupStep, syntax: ScriptSyntax) -> &'static [&'static str] {
    use ScriptSyntax::{Batch, Posix};
    use SetupStep::*;

    match (step, syntax) {
        (EnvironmentSetup, Posix) => &[
            "if [ ! -d \"{{VENV_DIR}}\" ]; then",
            "    python3 -m venv {{VENV_DIR}}",
            "fi",
            ". {{VENV_DIR}}/bin/activate",
        ],
        (EnvironmentSetup, Batch) => &[
            "if not exist \"{{VENV_DIR}}\" (",
            "    python -m venv {{VENV_DIR}}",
            "    if errorlevel 1 goto :error",
            ")",
            "call {{VENV_DIR}}\\Scripts\\activate.bat",
            "if errorlevel 1 goto :error",
        ],

        (DependencyInstall, Posix) => &["pip install --upgrade pip", "pip install -e ."],
        (DependencyInstall, Batch) => &[
            "python -m pip install --upgrade pip",
            "if errorlevel 1 goto :error",
            "pip install -e .",
            "if errorlevel 1 goto :error",
        ],

        (MigrationInit, Posix) => &[
            "if [ ! -d \"{{MIGRATIONS_DIR}}\" ]; then",
            "    alembic init {{MIGRATIONS_DIR}}",
            "fi",
            "mkdir -p {{MIGRATIONS_DIR}}/versions",
        ],
        (MigrationInit, Batch) => &[
            "if not exist \"{{MIGRATIONS_DIR}}\\\" (",
            "    alembic init {{MIGRATIONS_DIR}}",
            "    if errorlevel 1 goto :error",
            ")",
            "if not exist \"{{MIGRATIONS_DIR}}\\versions\" mkdir \"{{MIGRATIONS_DIR}}\\versions\"",
        ],

        (MigrationGenerate, Posix) => &["alembic revision --autogenerate -m \"Initial migration\""],
        (MigrationGenerate, Batch) => &[
            "alembic revision --autogenerate -m \"Initial migration\"",
            "if errorlevel 1 goto :error",
        ],

        (MigrationApply, Posix) => &["alembic upgrade head"],
        (MigrationApply, Batch) => &["alembic upgrade head", "if errorlevel 1 goto :error"],

        (ServerStart, Posix) => &[
            "echo \"Open http://localhost:{{SERVER_PORT}} once the server is up\"",
            "uvicorn {{APP_PACKAGE}}.main:app --reload --port {{SERVER_PORT}}",
        ],
        (ServerStart, Batch) => &[
            "echo Open http://localhost:{{SERVER_PORT}} once the server is up",
            "uvicorn {{APP_PACKAGE}}.main:app --reload --port {{SERVER_PORT}}",
            "if errorlevel 1 goto :error",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::template::{Placeholder, scan_placeholders};

    #[test]
    fn both_scripts_carry_the_same_steps_in_order() {
        let posix = parse_steps(&render_script(ScriptSyntax::Posix), ScriptSyntax::Posix);
        let batch = parse_steps(&render_script(ScriptSyntax::Batch), ScriptSyntax::Batch);
        assert_eq!(posix, SetupStep::ORDERED);
        assert_eq!(batch, SetupStep::ORDERED);
    }

    #[test]
    fn posix_script_fails_fast() {
        let script = render_script(ScriptSyntax::Posix);
        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        assert!(script.contains("\nset -e\n"));
        assert!(!script.contains('\r'));
    }

    #[test]
    fn batch_script_uses_crlf_and_checks_errorlevel() {
        let script = render_script(ScriptSyntax::Batch);
        assert!(script.starts_with("@echo off\r\n"));
        assert!(script.lines().all(|l| !l.ends_with('\r')));
        assert!(script.matches("if errorlevel 1 goto :error").count() >= SetupStep::ORDERED.len());
        assert!(script.contains(":error\r\n"));
    }

    #[test]
    fn markers_of_the_other_syntax_are_not_read() {
        let posix = render_script(ScriptSyntax::Posix);
        assert!(parse_steps(&posix, ScriptSyntax::Batch).is_empty());
    }

    #[test]
    fn unknown_markers_are_skipped() {
        let text = "# step: environment-setup\n# step: launch-rockets\n# step: server-start\n";
        assert_eq!(
            parse_steps(text, ScriptSyntax::Posix),
            [SetupStep::EnvironmentSetup, SetupStep::ServerStart]
        );
    }

    #[test]
    fn scripts_use_only_known_placeholders() {
        for syntax in [ScriptSyntax::Posix, ScriptSyntax::Batch] {
            let found = scan_placeholders(&render_script(syntax)).unwrap();
            assert!(found.contains(&Placeholder::VenvDir));
            assert!(found.contains(&Placeholder::ServerPort));
            assert!(found.contains(&Placeholder::MigrationsDir));
        }
    }

    #[test]
    fn migration_init_only_targets_a_missing_directory() {
        // `alembic init` refuses a directory that already has files in it
        let posix = render_script(ScriptSyntax::Posix);
        assert!(posix.contains("if [ ! -d \"{{MIGRATIONS_DIR}}\" ]; then"));
        let batch = render_script(ScriptSyntax::Batch);
        assert!(batch.contains("if not exist \"{{MIGRATIONS_DIR}}\\\" ("));
        for script in [posix, batch] {
            assert!(!script.contains("env.py"));
        }
    }
}

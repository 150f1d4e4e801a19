//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "fastforge",
    bin_name = "fastforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} FastAPI + SQLite + Alembic project generator",
    long_about = "FastForge generates a ready-to-run FastAPI project with async \
                  SQLAlchemy, SQLite, Alembic migrations and setup scripts for \
                  Linux, macOS and Windows.",
    after_help = "EXAMPLES:\n\
        \x20 fastforge generate blog_api\n\
        \x20 fastforge generate shop --output ~/code --dry-run\n\
        \x20 fastforge list --details\n\
        \x20 fastforge completions bash > /usr/share/bash-completion/completions/fastforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project.
    #[command(
        visible_alias = "new",
        about = "Generate a new FastAPI project",
        after_help = "EXAMPLES:\n\
            \x20 fastforge generate blog_api\n\
            \x20 fastforge generate \"Inventory Service\" --output ./projects\n\
            \x20 fastforge new shop --dry-run"
    )]
    Generate(GenerateArgs),

    /// List database variants and their catalogs.
    #[command(
        visible_alias = "ls",
        about = "List database variants",
        after_help = "EXAMPLES:\n\
            \x20 fastforge list\n\
            \x20 fastforge list --details\n\
            \x20 fastforge list --format json"
    )]
    List(ListArgs),

    /// Initialise a FastForge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 fastforge init\n\
            \x20 fastforge init --force\n\
            \x20 fastforge --config ./fastforge.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 fastforge completions bash > ~/.local/share/bash-completion/completions/fastforge\n\
            \x20 fastforge completions zsh  > ~/.zfunc/_fastforge\n\
            \x20 fastforge completions fish > ~/.config/fish/completions/fastforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the FastForge configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 fastforge config get generation.server_port\n\
            \x20 fastforge config list\n\
            \x20 fastforge config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `fastforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project name. Characters outside letters, digits, `-` and `_` are
    /// replaced, so the project always lands directly in the output directory.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Database variant (default from config, normally `sqlite`).
    #[arg(
        short = 'd',
        long = "variant",
        visible_alias = "db",
        value_name = "VARIANT",
        help = "Database variant: sqlite, postgres, mongo"
    )]
    pub variant: Option<String>,

    /// Directory the project root is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `fastforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    /// Show catalog details and manual steps.
    #[arg(long = "details", help = "Show catalog details and manual migration steps")]
    pub details: bool,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One variant per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `fastforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `fastforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `fastforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.server_port`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

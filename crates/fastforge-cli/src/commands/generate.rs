//! Implementation of the `fastforge generate` command.
//!
//! Responsibility: turn CLI arguments and config into a call to the core
//! `GenerateService`, and display the result. No generation logic lives here.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use fastforge_adapters::{BuiltinRegistry, LocalFilesystem};
use fastforge_core::{
    application::{GenerateService, GenerationReport, PreparedProject},
    domain::{DatabaseVariant, PlanEntry},
    error::ForgeError,
};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// JSON document printed for `--output-format json`.
#[derive(Debug, Serialize)]
struct GenerateSummary {
    dry_run: bool,
    project: String,
    package: String,
    display_title: String,
    variant: DatabaseVariant,
    catalog: String,
    plan_id: Uuid,
    root: PathBuf,
    directories: Vec<String>,
    files: Vec<String>,
    generated_at: DateTime<Utc>,
}

impl GenerateSummary {
    fn from_prepared(prepared: &PreparedProject, root: PathBuf, dry_run: bool) -> Self {
        Self {
            dry_run,
            project: prepared.spec.sanitized_name().to_string(),
            package: prepared.spec.package_name().to_string(),
            display_title: prepared.spec.display_title().to_string(),
            variant: prepared.spec.database_variant(),
            catalog: prepared.catalog_id.to_string(),
            plan_id: prepared.plan.plan_id(),
            root,
            directories: prepared.plan.directories().map(ToString::to_string).collect(),
            files: prepared.plan.files().map(|f| f.path.to_string()).collect(),
            generated_at: Utc::now(),
        }
    }
}

/// Execute the `fastforge generate` command.
///
/// 1. Resolve variant and output directory (flag, then config, then default)
/// 2. Prepare the plan; every naming and template error surfaces here
/// 3. Early-exit with a preview if `--dry-run`
/// 4. Emit the tree, rolled back by the core on failure
/// 5. Print next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let variant_name = args.variant.as_deref().unwrap_or(&config.defaults.variant);
    let variant: DatabaseVariant = variant_name.parse().map_err(ForgeError::from)?;

    let output_dir = match args.output.or(config.defaults.output_dir) {
        Some(dir) => dir,
        None => std::env::current_dir()
            .with_cli_context(|| "Failed to read the current directory")?,
    };
    debug!(variant = %variant, output_dir = %output_dir.display(), "Arguments resolved");

    let service = GenerateService::new(
        Box::new(BuiltinRegistry::with_builtin()?),
        Box::new(LocalFilesystem::new()),
    )
    .with_settings(config.generation);

    let prepared = service.prepare(&args.name, variant)?;
    let root = prepared.root_in(&output_dir);

    if args.dry_run {
        return show_dry_run(&prepared, root, &output);
    }

    output.header(&format!(
        "Creating '{}' ({})...",
        prepared.spec.sanitized_name(),
        prepared.catalog_id
    ))?;

    let summary = GenerateSummary::from_prepared(&prepared, root, false);
    let spinner = output.spinner("Writing project files...");
    let result = service.emit(prepared, &output_dir);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    info!(
        project = %report.spec.sanitized_name(),
        files = report.emission.files,
        "Project generated"
    );

    if output.format() == OutputFormat::Json {
        output.json(&summary)?;
        return Ok(());
    }

    show_next_steps(&report, service.settings().server_port, &output)
}

fn show_dry_run(
    prepared: &PreparedProject,
    root: PathBuf,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(&GenerateSummary::from_prepared(prepared, root, true))?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: would create '{}' at {}",
        prepared.spec.sanitized_name(),
        root.display()
    ))?;
    output.detail(&format!("  Package:  {}", prepared.spec.package_name()))?;
    output.detail(&format!("  Title:    {}", prepared.spec.display_title()))?;
    output.detail(&format!("  Catalog:  {}", prepared.catalog_id))?;
    output.print("")?;

    for entry in prepared.plan.entries() {
        let line = match entry {
            PlanEntry::Directory(dir) => format!("  {dir}/"),
            PlanEntry::File(file) if file.permissions.executable_flag() => {
                format!("  {} (executable)", file.path)
            }
            PlanEntry::File(file) => format!("  {}", file.path),
        };
        output.print(&line)?;
    }

    output.print("")?;
    output.detail(&format!(
        "{} directories, {} files. Nothing was written.",
        prepared.plan.directory_count(),
        prepared.plan.file_count()
    ))?;
    Ok(())
}

/// Quote a path for a `cd` line when it contains whitespace.
fn shell_path(path: &Path) -> String {
    let shown = path.display().to_string();
    if shown.chars().any(char::is_whitespace) {
        format!("\"{shown}\"")
    } else {
        shown
    }
}

fn show_next_steps(report: &GenerationReport, port: u16, output: &OutputManager) -> CliResult<()> {
    let name = report.spec.sanitized_name();
    output.success(&format!(
        "Project '{name}' created at {}",
        report.emission.root.display()
    ))?;

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", shell_path(&report.emission.root)))?;
    output.print("  ./setup.sh        # Linux / macOS")?;
    output.print("  setup.bat         # Windows")?;
    output.print("")?;
    output.detail(&format!(
        "Then open http://localhost:{port}/docs for the interactive API docs."
    ))?;
    Ok(())
}

//! Implementation of the `fastforge list` command.

use std::borrow::Cow;

use fastforge_adapters::BuiltinRegistry;
use fastforge_core::application::{CatalogService, VariantInfo};

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let service = CatalogService::new(Box::new(BuiltinRegistry::with_builtin()?));
    let variants = service.list_variants()?;

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => print_table(&variants, args.details, &output)?,
        ListFormat::Json => output.json(&variants)?,
        ListFormat::List => {
            for v in &variants {
                output.data(&v.variant)?;
            }
        }
        ListFormat::Csv => {
            output.data("variant,label,generator_supported,catalog_id,file_count")?;
            for v in &variants {
                output.data(&csv_row(v))?;
            }
        }
    }

    Ok(())
}

fn print_table(variants: &[VariantInfo], details: bool, output: &OutputManager) -> CliResult<()> {
    output.header("Database variants:")?;
    for v in variants {
        let status = if v.generator_supported {
            "generated"
        } else {
            "manual steps"
        };
        output.print(&format!(
            "  {:<10} {:<12} {:<14} {}",
            v.variant,
            v.label,
            status,
            v.catalog_id.as_deref().unwrap_or("-")
        ))?;

        if !details {
            continue;
        }
        if let Some(description) = &v.description {
            output.detail(&format!("      {description}"))?;
        }
        if let Some(count) = v.file_count {
            output.detail(&format!("      {count} files; tags: {}", v.tags.join(", ")))?;
        }
        for step in &v.manual_steps {
            output.detail(&format!("      • {step}"))?;
        }
    }

    if !details {
        output.print("")?;
        output.detail("Use --details to see catalog contents and manual migration steps.")?;
    }
    Ok(())
}

fn csv_row(v: &VariantInfo) -> String {
    format!(
        "{},{},{},{},{}",
        csv_field(&v.variant),
        csv_field(&v.label),
        v.generator_supported,
        csv_field(v.catalog_id.as_deref().unwrap_or("")),
        v.file_count.map(|n| n.to_string()).unwrap_or_default()
    )
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

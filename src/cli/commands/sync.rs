//! Merge bundled defaults into a user-edited document

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::cli::Output;
use autoconfig::Document;
use autoconfig::defaults::{merge_defaults, sync_with_defaults};

#[derive(Args)]
pub struct SyncArgs {
    /// Document to update, created from the defaults if missing
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Defaults document
    #[arg(long, value_name = "FILE")]
    pub defaults: PathBuf,

    /// Show what would be added without writing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: SyncArgs, output: &Output) -> Result<()> {
    let defaults_text = fs::read_to_string(&args.defaults)
        .with_context(|| format!("Failed to read defaults {}", args.defaults.display()))?;

    if args.dry_run {
        return preview(&args, &defaults_text, output);
    }

    let report = sync_with_defaults(&args.file, &defaults_text)
        .with_context(|| format!("Failed to sync {}", args.file.display()))?;

    if report.created {
        output.success(&format!(
            "Created {} from {}",
            args.file.display(),
            args.defaults.display()
        ));
    } else if report.added.is_empty() {
        output.info(&format!("{} is up to date", args.file.display()));
    } else {
        output.success(&format!(
            "Added {} missing keys to {}",
            report.added.len(),
            args.file.display()
        ));
        for path in &report.added {
            output.list_item(path);
        }
    }
    Ok(())
}

fn preview(args: &SyncArgs, defaults_text: &str, output: &Output) -> Result<()> {
    let defaults = Document::parse(defaults_text)
        .with_context(|| format!("{} is not a valid document", args.defaults.display()))?;

    if !args.file.exists() {
        output.info(&format!(
            "{} does not exist and would be created from {}",
            args.file.display(),
            args.defaults.display()
        ));
        return Ok(());
    }

    let report = merge_defaults(&args.file, &defaults)
        .with_context(|| format!("Failed to merge defaults into {}", args.file.display()))?;
    if report.added.is_empty() {
        output.info(&format!("{} is up to date", args.file.display()));
        return Ok(());
    }

    output.info(&format!("Would add {} keys:", report.added.len()));
    for path in &report.added {
        output.list_item(path);
    }
    Ok(())
}

//! Check that a document parses and list its option paths

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::cli::Output;
use autoconfig::Document;

#[derive(Args)]
pub struct CheckArgs {
    /// Document to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn execute(args: CheckArgs, output: &Output) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = Document::parse(&text)
        .with_context(|| format!("{} is not a valid document", args.file.display()))?;

    let paths = document.leaf_paths();
    if paths.is_empty() {
        output.warning(&format!("{} is empty", args.file.display()));
        return Ok(());
    }

    output.success(&format!(
        "{} is valid ({} options)",
        args.file.display(),
        paths.len()
    ));
    for path in &paths {
        output.list_item(path);
    }
    Ok(())
}

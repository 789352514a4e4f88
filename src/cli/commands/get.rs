//! Print the value stored at a dotted path

use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

use crate::cli::Output;
use autoconfig::Document;

#[derive(Args)]
pub struct GetArgs {
    /// Document to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dotted option path, e.g. `limits.max`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: ValueFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ValueFormat {
    Yaml,
    Json,
}

pub fn execute(args: GetArgs, output: &Output) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = Document::parse(&text)
        .with_context(|| format!("{} is not a valid document", args.file.display()))?;

    let value = document
        .get_path(&args.path)
        .ok_or_else(|| anyhow!("{} is not set in {}", args.path, args.file.display()))?;

    let rendered = match args.format {
        ValueFormat::Yaml => serde_yml::to_string(value).context("Failed to encode value as YAML")?,
        ValueFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to encode value as JSON")?
        }
    };
    output.raw(&rendered);
    Ok(())
}

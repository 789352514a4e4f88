//! Write comments from a comment table above matching options
//!
//! The comment table is itself a YAML mapping from option path to comment
//! text, for example:
//!
//! ```yaml
//! limits: Bounds applied to every request
//! limits.max: Upper bound
//! ```

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_yml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use autoconfig::{CommentTable, Document, annotate};

#[derive(Args)]
pub struct AnnotateArgs {
    /// Document to annotate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Comment table: a YAML mapping of option path to comment text
    #[arg(long, value_name = "FILE")]
    pub comments: PathBuf,

    /// Write the result here instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn execute(args: AnnotateArgs, output: &Output) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = Document::parse(&text)
        .with_context(|| format!("{} is not a valid document", args.file.display()))?;
    let table = load_comment_table(&args.comments)?;
    output.verbose(&format!("Loaded {} comments", table.len()));

    // Re-serialize first so the text matches the layout the annotator expects
    let annotated = annotate(&document.to_yaml()?, &table);

    match &args.output {
        Some(target) => {
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(target, &annotated)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            output.success(&format!("Wrote {}", target.display()));
        }
        None => output.raw(&annotated),
    }
    Ok(())
}

fn load_comment_table(path: &Path) -> Result<CommentTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read comments {}", path.display()))?;
    let value: Value = serde_yml::from_str(&text)
        .with_context(|| format!("{} is not valid YAML", path.display()))?;

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(CommentTable::new()),
        _ => bail!("{} must be a mapping of option path to comment", path.display()),
    };

    let mut table = CommentTable::new();
    for (key, comment) in mapping {
        let (Some(key), Some(comment)) = (key.as_str(), comment.as_str()) else {
            bail!(
                "{} must map option paths to comment strings",
                path.display()
            );
        };
        table.insert(key, comment);
    }
    Ok(table)
}

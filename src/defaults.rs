//! Keep a user-edited document in step with bundled defaults
//!
//! Message formats and similar free-form documents ship with a defaults file
//! embedded in the program. On startup the user's copy is created from it, and
//! on later runs any keys added to the defaults since are merged into the
//! user's copy without touching values the user changed.

use crate::document::Document;
use crate::error::{ConfigError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SyncReport {
    /// The merged document as it now stands on disk
    pub document: Document,
    /// Dotted paths copied over from the defaults
    pub added: Vec<String>,
    /// Whether the file did not exist and was written from the defaults
    pub created: bool,
}

/// Create or update `path` from `defaults_text`.
///
/// A missing file receives `defaults_text` verbatim, comments included. An
/// existing file gains the missing keys and is only rewritten when something
/// was added.
pub fn sync_with_defaults(path: &Path, defaults_text: &str) -> Result<SyncReport> {
    let defaults = Document::parse(defaults_text)?;

    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::write(path, defaults_text).map_err(|e| ConfigError::io(path, e))?;
        tracing::debug!("Wrote bundled defaults to {}", path.display());

        return Ok(SyncReport {
            added: defaults.leaf_paths(),
            document: defaults,
            created: true,
        });
    }

    let report = merge_defaults(path, &defaults)?;
    if !report.added.is_empty() {
        let text = report.document.to_yaml()?;
        fs::write(path, text).map_err(|e| ConfigError::io(path, e))?;
        tracing::info!(
            "Added {} missing keys to {}",
            report.added.len(),
            path.display()
        );
    }
    Ok(report)
}

/// Merge without writing anything, for previews.
pub fn merge_defaults(path: &Path, defaults: &Document) -> Result<SyncReport> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let mut document = Document::parse(&text)?;
    let added = document.merge_missing(defaults);

    Ok(SyncReport {
        document,
        added,
        created: false,
    })
}

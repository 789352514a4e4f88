use crate::document::Document;
use crate::error::{ConfigError, Result};
use crate::schema::{ConfigRecord, Schema};
use std::fs;
use std::path::Path;

/// Read and parse the backing file, creating it empty when missing.
pub(crate) fn read_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::File::create(path).map_err(|e| ConfigError::io(path, e))?;
        tracing::debug!("Created empty configuration file {}", path.display());
    }

    let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    Document::parse(&text)
}

/// Copy every option present in `document` into `record`, then run the
/// post-load hook.
///
/// Required options are checked before anything is decoded, so a missing one
/// leaves the record untouched. Options missing from the document otherwise
/// keep their current value. A coercion failure stops the load; options
/// handled before it keep their new values.
pub(crate) fn populate<R: ConfigRecord>(
    schema: &Schema<R>,
    record: &mut R,
    document: &Document,
) -> Result<()> {
    if let Some(field) = schema
        .fields()
        .iter()
        .find(|field| !document.contains(field.path()) && field.is_unset(record))
    {
        return Err(ConfigError::MissingRequiredField {
            path: field.path().to_string(),
            comment: field.comment().map(str::to_string),
        });
    }

    for field in schema.fields() {
        match document.get(field.path()) {
            Some(node) => field.decode_into(record, node)?,
            None if document.holds_null(field.path()) => tracing::warn!(
                "{} is empty in the document, keeping default",
                field.path()
            ),
            None => tracing::trace!("{} not in document, keeping default", field.path()),
        }
    }

    record.post_load().map_err(ConfigError::PostLoad)
}

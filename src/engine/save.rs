use super::comments::{CommentTable, annotate};
use crate::document::Document;
use crate::error::{ConfigError, Result};
use crate::schema::{ConfigRecord, Schema};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Build a fresh document holding every option of `record`.
///
/// Category sections are created even when all of their options are unset.
pub(crate) fn to_document<R: ConfigRecord>(schema: &Schema<R>, record: &R) -> Result<Document> {
    let mut document = Document::new();
    for field in schema.fields() {
        document.ensure_section(field.path().category());
        if let Some(value) = field.encode(record)? {
            document.set(field.path(), value);
        }
    }
    Ok(document)
}

/// Produce the final file text: pre-save hook on a snapshot, serialize, then
/// splice comments back in.
pub(crate) fn render<R: ConfigRecord>(
    schema: &Schema<R>,
    record: &R,
    category_comments: &BTreeMap<String, String>,
) -> Result<String> {
    let mut snapshot = record.clone();
    snapshot.pre_save().map_err(ConfigError::PreSave)?;

    let text = to_document(schema, &snapshot)?.to_yaml()?;
    let comments = CommentTable::for_record(schema, category_comments);
    Ok(annotate(&text, &comments))
}

/// Replace the file contents with `text` in a single write.
pub(crate) fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| ConfigError::io(path, e))
}

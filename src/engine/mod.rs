//! Loading and saving records against their backing file

use crate::error::Result;
use crate::schema::{ConfigRecord, Schema};
use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod comments;
mod load;
mod save;

/// A configuration record bound to the YAML file it is persisted in.
///
/// Loading and saving are synchronous and assume this value is the only
/// writer of its file. `load` and `save` never return errors: failures are
/// logged and reported as `false`. Use [`try_load`](Self::try_load) and
/// [`try_save`](Self::try_save) to inspect the error instead.
pub struct ConfigFile<R: ConfigRecord> {
    path: PathBuf,
    schema: Arc<Schema<R>>,
    record: R,
    category_comments: BTreeMap<String, String>,
}

impl<R: ConfigRecord> ConfigFile<R> {
    /// Bind a default record to `path` using the shared option table.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_record(path, R::default())
    }

    pub fn with_record(path: impl Into<PathBuf>, record: R) -> Result<Self> {
        Ok(Self::with_schema(path, Schema::shared()?, record))
    }

    pub fn with_schema(path: impl Into<PathBuf>, schema: Arc<Schema<R>>, record: R) -> Self {
        Self {
            path: path.into(),
            schema,
            record,
            category_comments: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema<R> {
        &self.schema
    }

    pub fn get(&self) -> &R {
        &self.record
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn into_inner(self) -> R {
        self.record
    }

    /// Register a comment block written above `category`'s header on save.
    pub fn set_category_comment(&mut self, category: impl Into<String>, comment: impl Into<String>) {
        self.category_comments.insert(category.into(), comment.into());
    }

    /// Load the file into the record. Returns `false` and logs on failure, in
    /// which case the record may be partially updated and should be discarded.
    pub fn load(&mut self) -> bool {
        match self.try_load() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to load configuration {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub fn try_load(&mut self) -> Result<()> {
        let document = load::read_document(&self.path)?;
        load::populate(&self.schema, &mut self.record, &document)?;
        tracing::debug!("Loaded configuration {}", self.path.display());
        Ok(())
    }

    /// Reset the record to its defaults and load the file again, so options
    /// removed from the file fall back to their defaults.
    pub fn reload(&mut self) -> bool {
        self.record = R::default();
        self.load()
    }

    /// Write the record to the file. Returns `false` and logs on failure; the
    /// file is left untouched unless the whole text was assembled.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save configuration {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub fn try_save(&self) -> Result<()> {
        let text = self.render()?;
        save::write_file(&self.path, &text)?;
        tracing::debug!("Saved configuration {}", self.path.display());
        Ok(())
    }

    /// The exact text `save` would write, comments included.
    pub fn render(&self) -> Result<String> {
        save::render(&self.schema, &self.record, &self.category_comments)
    }
}

impl<R: ConfigRecord> Deref for ConfigFile<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.record
    }
}

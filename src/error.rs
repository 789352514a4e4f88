//! Error types for loading and saving configuration records

use std::path::PathBuf;
use thiserror::Error;

/// Every way a load or save can fail.
///
/// [`ConfigFile::load`](crate::ConfigFile::load) and
/// [`ConfigFile::save`](crate::ConfigFile::save) log these and return `false`;
/// the `try_*` variants hand them back to the caller.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed configuration document: {0}")]
    DocumentSyntax(String),

    #[error("{path} is required to be set!{}", comment_suffix(.comment))]
    MissingRequiredField {
        path: String,
        comment: Option<String>,
    },

    #[error("Cannot use type {shape} for option '{path}'")]
    UnsupportedFieldType { path: String, shape: String },

    #[error("Option '{path}' expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Invalid option registration: {0}")]
    InvalidSchema(String),

    #[error("Failed to encode option '{path}': {message}")]
    Encode { path: String, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Post-load hook rejected the configuration: {0:#}")]
    PostLoad(anyhow::Error),

    #[error("Pre-save hook failed: {0:#}")]
    PreSave(anyhow::Error),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

fn comment_suffix(comment: &Option<String>) -> String {
    match comment {
        Some(text) => format!(" Info:\n{text}"),
        None => String::new(),
    }
}

/// Result alias used across the engine.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

//! In-memory YAML document
//!
//! A thin ordered layer over `serde_yml::Mapping`. Options live either at the
//! top level or one level down inside a category mapping. Key order follows
//! the file and new keys are appended to the end of their mapping. Comments
//! are not part of the model; see [`crate::engine::comments`].

use crate::error::{ConfigError, Result};
use serde_yml::{Mapping, Value};
use std::fmt;

/// Location of an option: an optional category plus the option key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionPath {
    category: String,
    key: String,
}

impl OptionPath {
    pub fn new(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
        }
    }

    pub fn top_level(key: impl Into<String>) -> Self {
        Self::new("", key)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_top_level(&self) -> bool {
        self.category.is_empty()
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top_level() {
            f.write_str(&self.key)
        } else {
            write!(f, "{}.{}", self.category, self.key)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML text. Empty or comment-only text is an empty document.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_yml::from_str(text).map_err(|e| ConfigError::DocumentSyntax(e.to_string()))?;

        match value {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::DocumentSyntax(format!(
                "top level must be a mapping, found {}",
                crate::value::describe(&other)
            ))),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(&self.root).map_err(|e| ConfigError::Encode {
            path: "<document>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Value stored at `path`. Keys holding `null` count as absent.
    pub fn get(&self, path: &OptionPath) -> Option<&Value> {
        let value = if path.is_top_level() {
            self.root.get(path.key())?
        } else {
            self.root.get(path.category())?.as_mapping()?.get(path.key())?
        };

        if value.is_null() { None } else { Some(value) }
    }

    pub fn contains(&self, path: &OptionPath) -> bool {
        self.get(path).is_some()
    }

    /// Whether `path` is present as a key but holds `null`.
    pub fn holds_null(&self, path: &OptionPath) -> bool {
        let value = if path.is_top_level() {
            self.root.get(path.key())
        } else {
            self.root
                .get(path.category())
                .and_then(Value::as_mapping)
                .and_then(|section| section.get(path.key()))
        };
        value.is_some_and(Value::is_null)
    }

    /// Create an empty category mapping unless one is already present.
    pub fn ensure_section(&mut self, category: &str) {
        if category.is_empty() {
            return;
        }
        let is_mapping = self
            .root
            .get(category)
            .is_some_and(|value| value.is_mapping());
        if !is_mapping {
            self.root
                .insert(Value::String(category.to_string()), Value::Mapping(Mapping::new()));
        }
    }

    pub fn set(&mut self, path: &OptionPath, value: Value) {
        let key = Value::String(path.key().to_string());
        if path.is_top_level() {
            self.root.insert(key, value);
            return;
        }

        self.ensure_section(path.category());
        if let Some(Value::Mapping(section)) = self.root.get_mut(path.category()) {
            section.insert(key, value);
        }
    }

    /// Look up a dotted path of any depth, e.g. `messages.kill.self`.
    pub fn get_path(&self, dotted: &str) -> Option<&Value> {
        let mut segments = dotted.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Dotted paths of every leaf value, in document order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaves("", &self.root, &mut paths);
        paths
    }

    /// Copy every key present in `defaults` but missing here, at any depth.
    ///
    /// Existing values are never replaced, even when the defaults hold a
    /// mapping where this document holds a scalar. Returns the dotted paths
    /// that were added.
    pub fn merge_missing(&mut self, defaults: &Document) -> Vec<String> {
        let mut added = Vec::new();
        merge_into("", &mut self.root, &defaults.root, &mut added);
        added
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => crate::value::describe(other),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn collect_leaves(prefix: &str, map: &Mapping, out: &mut Vec<String>) {
    for (key, value) in map {
        let full = join(prefix, &key_name(key));
        match value {
            Value::Mapping(nested) if !nested.is_empty() => collect_leaves(&full, nested, out),
            _ => out.push(full),
        }
    }
}

fn merge_into(prefix: &str, target: &mut Mapping, defaults: &Mapping, added: &mut Vec<String>) {
    for (key, value) in defaults {
        let full = join(prefix, &key_name(key));
        match target.get_mut(key) {
            None | Some(Value::Null) => {
                target.insert(key.clone(), value.clone());
                added.push(full);
            }
            Some(Value::Mapping(existing)) => {
                if let Value::Mapping(nested) = value {
                    merge_into(&full, existing, nested, added);
                }
            }
            Some(_) => {}
        }
    }
}

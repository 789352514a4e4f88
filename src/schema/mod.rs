//! Option registration for configuration records
//!
//! A record lists its options once in [`ConfigRecord::describe`]; every entry
//! pairs a key with a typed getter and mutator, so the set of supported field
//! types is checked by the compiler. The resulting [`Schema`] is built once per
//! record type and shared through [`Schema::shared`].
//!
//! ```rust
//! use autoconfig::{ConfigRecord, SchemaBuilder, option};
//!
//! #[derive(Debug, Clone)]
//! struct Limits {
//!     max: i32,
//!     banned: Vec<String>,
//!     owner: Option<String>,
//! }
//!
//! impl Default for Limits {
//!     fn default() -> Self {
//!         Self { max: 10, banned: Vec::new(), owner: None }
//!     }
//! }
//!
//! impl ConfigRecord for Limits {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema
//!             .option("max", |c| &c.max, |c| &mut c.max)
//!             .category("limits")
//!             .comment("Upper bound");
//!         option!(schema, banned).comment("Names that may never join");
//!         // No default, so this one is required
//!         option!(schema, owner);
//!     }
//! }
//! ```

use crate::document::OptionPath;
use crate::error::{ConfigError, Result};
use crate::value::{CoercionError, FieldShape, FieldValue};
use serde_yml::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

mod registry;

/// A typed record persisted as a YAML document.
pub trait ConfigRecord: Default + Clone + Send + Sync + 'static {
    /// Register every option of the record.
    fn describe(schema: &mut SchemaBuilder<Self>);

    /// Called after all options were read. May normalize fields; an error
    /// fails the load.
    fn post_load(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called on the copy about to be written. Changes never reach the live
    /// record.
    fn pre_save(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Register an option under the field's own name.
///
/// `option!(schema, max)` is shorthand for
/// `schema.option("max", |r| &r.max, |r| &mut r.max)`.
#[macro_export]
macro_rules! option {
    ($schema:expr, $field:ident) => {
        $schema.option(
            stringify!($field),
            |record| &record.$field,
            |record| &mut record.$field,
        )
    };
}

/// Type-erased getter/mutator pair for one option.
trait FieldBinding<R>: Send + Sync {
    fn is_unset(&self, record: &R) -> bool;

    fn encode(&self, record: &R) -> Result<Option<Value>, CoercionError>;

    fn decode_into(&self, record: &mut R, node: &Value) -> Result<(), CoercionError>;
}

struct Accessor<R, F> {
    get: fn(&R) -> &F,
    get_mut: fn(&mut R) -> &mut F,
}

impl<R, F: FieldValue> FieldBinding<R> for Accessor<R, F> {
    fn is_unset(&self, record: &R) -> bool {
        (self.get)(record).is_unset()
    }

    fn encode(&self, record: &R) -> Result<Option<Value>, CoercionError> {
        (self.get)(record).to_node()
    }

    fn decode_into(&self, record: &mut R, node: &Value) -> Result<(), CoercionError> {
        // Decode fully before touching the record so a mismatch leaves it as is
        let value = F::from_node(node)?;
        *(self.get_mut)(record) = value;
        Ok(())
    }
}

/// One registered option, as handed to [`ConfigRecord::describe`].
pub struct OptionSpec<R> {
    key: String,
    category: String,
    comment: Option<String>,
    shape: FieldShape,
    binding: Box<dyn FieldBinding<R>>,
}

impl<R> OptionSpec<R> {
    /// Place the option inside a category section.
    pub fn category(&mut self, category: impl Into<String>) -> &mut Self {
        self.category = category.into();
        self
    }

    /// Documentation written above the option. May span several lines.
    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        let comment = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
        self
    }
}

pub struct SchemaBuilder<R> {
    options: Vec<OptionSpec<R>>,
    category_comments: BTreeMap<String, String>,
}

impl<R: 'static> SchemaBuilder<R> {
    fn new() -> Self {
        Self {
            options: Vec::new(),
            category_comments: BTreeMap::new(),
        }
    }

    /// Register an option backed by a record field.
    pub fn option<F: FieldValue + 'static>(
        &mut self,
        key: &str,
        get: fn(&R) -> &F,
        get_mut: fn(&mut R) -> &mut F,
    ) -> &mut OptionSpec<R> {
        self.options.push(OptionSpec {
            key: key.to_string(),
            category: String::new(),
            comment: None,
            shape: F::shape(),
            binding: Box::new(Accessor { get, get_mut }),
        });
        let last = self.options.len() - 1;
        &mut self.options[last]
    }

    /// Comment block written above a category header on every save.
    pub fn category_comment(&mut self, category: impl Into<String>, comment: impl Into<String>) {
        self.category_comments.insert(category.into(), comment.into());
    }
}

/// Immutable description of a registered option.
pub struct FieldDescriptor<R> {
    path: OptionPath,
    shape: FieldShape,
    required: bool,
    comment: Option<String>,
    binding: Box<dyn FieldBinding<R>>,
}

impl<R> FieldDescriptor<R> {
    /// Where the option lives in the document.
    pub fn path(&self) -> &OptionPath {
        &self.path
    }

    /// Declared type of the option.
    pub fn shape(&self) -> &FieldShape {
        &self.shape
    }

    /// True when the record's default leaves this option unset.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Documentation written above the option, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub(crate) fn is_unset(&self, record: &R) -> bool {
        self.binding.is_unset(record)
    }

    pub(crate) fn encode(&self, record: &R) -> Result<Option<Value>> {
        self.binding
            .encode(record)
            .map_err(|err| coercion_error(&self.path, err))
    }

    pub(crate) fn decode_into(&self, record: &mut R, node: &Value) -> Result<()> {
        self.binding
            .decode_into(record, node)
            .map_err(|err| coercion_error(&self.path, err))
    }
}

fn coercion_error(path: &OptionPath, err: CoercionError) -> ConfigError {
    match err {
        CoercionError::Mismatch { expected, found } => ConfigError::TypeMismatch {
            path: path.to_string(),
            expected,
            found,
        },
        CoercionError::Encode(message) => ConfigError::Encode {
            path: path.to_string(),
            message,
        },
    }
}

/// The validated option table of one record type.
pub struct Schema<R> {
    fields: Vec<FieldDescriptor<R>>,
    category_comments: BTreeMap<String, String>,
}

impl<R: ConfigRecord> Schema<R> {
    /// Build and validate the option table without caching it.
    pub fn build() -> Result<Self> {
        let mut builder = SchemaBuilder::new();
        R::describe(&mut builder);

        let defaults = R::default();
        let categories: HashSet<&str> = builder
            .options
            .iter()
            .map(|spec| spec.category.as_str())
            .filter(|category| !category.is_empty())
            .collect();

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(builder.options.len());
        for spec in &builder.options {
            validate_name(&spec.key, "option key")?;
            if !spec.category.is_empty() {
                validate_name(&spec.category, "category")?;
            }

            let path = OptionPath::new(spec.category.clone(), spec.key.clone());
            spec.shape
                .validate()
                .map_err(|_| ConfigError::UnsupportedFieldType {
                    path: path.to_string(),
                    shape: spec.shape.to_string(),
                })?;

            if path.is_top_level() && categories.contains(path.key()) {
                return Err(ConfigError::InvalidSchema(format!(
                    "option '{path}' has the same name as a category"
                )));
            }
            if !seen.insert(path.clone()) {
                return Err(ConfigError::InvalidSchema(format!(
                    "option '{path}' is registered twice"
                )));
            }

            fields.push(path);
        }

        let fields = builder
            .options
            .into_iter()
            .zip(fields)
            .map(|(spec, path)| FieldDescriptor {
                required: spec.binding.is_unset(&defaults),
                path,
                shape: spec.shape,
                comment: spec.comment,
                binding: spec.binding,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Registered {} options for {}",
            fields.len(),
            std::any::type_name::<R>()
        );

        Ok(Self {
            fields,
            category_comments: builder.category_comments,
        })
    }

    /// The process-wide option table for `R`, built on first use.
    pub fn shared() -> Result<Arc<Self>> {
        registry::schema_for::<R>()
    }
}

impl<R> Schema<R> {
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    pub fn field(&self, path: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|field| field.path.to_string() == path)
    }

    pub fn category_comments(&self) -> &BTreeMap<String, String> {
        &self.category_comments
    }
}

fn validate_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::InvalidSchema(format!("{what} cannot be empty")));
    }
    if name.contains('.') || name.contains('\n') {
        return Err(ConfigError::InvalidSchema(format!(
            "{what} '{name}' cannot contain '.' or line breaks"
        )));
    }
    Ok(())
}

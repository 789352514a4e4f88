//! # autoconfig - Declarative YAML Configuration Records
//!
//! Describe a record's options once, then load them from a YAML file, fill
//! in defaults, enforce required options, and write the record back with a
//! documentation comment above every option.
//!
//! ## Features
//!
//! - **Typed options**: shorts, ints, longs, floats, doubles, booleans,
//!   strings, opaque host values, and arrays, lists and sets of scalars
//! - **Required options**: an option left unset by `Default` must be in the file
//! - **Preserved documentation**: comments are re-injected on every save
//! - **Lifecycle hooks**: normalize after loading, convert before saving
//! - **Bundled defaults**: keep a free-form document in step with shipped defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoconfig::{ConfigFile, ConfigRecord, SchemaBuilder, option};
//! use std::collections::HashSet;
//!
//! #[derive(Debug, Clone, Default)]
//! struct PluginConfig {
//!     disabled_modules: HashSet<String>,
//! }
//!
//! impl ConfigRecord for PluginConfig {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema
//!             .option("disabledModules", |c| &c.disabled_modules, |c| &mut c.disabled_modules)
//!             .comment("Modules that will not be enabled on startup");
//!     }
//!
//!     fn post_load(&mut self) -> anyhow::Result<()> {
//!         self.disabled_modules = self.disabled_modules.iter().map(|m| m.to_lowercase()).collect();
//!         Ok(())
//!     }
//! }
//!
//! let mut config = ConfigFile::<PluginConfig>::new("plugins/demo/config.yml")?;
//! if config.load() {
//!     config.save();
//! }
//! # Ok::<(), autoconfig::ConfigError>(())
//! ```

pub mod defaults;
pub mod document;
pub mod engine;
pub mod error;
pub mod schema;
pub mod value;

pub use document::{Document, OptionPath};
pub use engine::ConfigFile;
pub use engine::comments::{CommentTable, annotate};
pub use error::{ConfigError, Result};
pub use schema::{ConfigRecord, FieldDescriptor, OptionSpec, Schema, SchemaBuilder};
pub use value::{FieldShape, FieldValue, Host, Scalar, ScalarKind};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

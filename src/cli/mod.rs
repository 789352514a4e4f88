//! Command-line interface for autoconfig
//!
//! Records are compile-time types, so the CLI works on plain documents:
//! checking them, reading values, syncing bundled defaults and applying
//! comment tables.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;

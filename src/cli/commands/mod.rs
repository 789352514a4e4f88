use anyhow::Result;
use clap::{Parser, Subcommand};

use super::Output;

pub mod annotate;
pub mod check;
pub mod get;
pub mod sync;

#[derive(Parser)]
#[command(
    name = "autoconfig",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect and maintain YAML configuration documents",
    long_about = "autoconfig checks configuration documents, reads values by dotted path, \
                  merges bundled defaults into user-edited files and writes documentation \
                  comments above options."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a document and list its option paths
    Check(check::CheckArgs),
    /// Print the value at a dotted path
    Get(get::GetArgs),
    /// Add keys missing from a document using a defaults file
    Sync(sync::SyncArgs),
    /// Write comments from a comment table above matching options
    Annotate(annotate::AnnotateArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Commands::Check(args) => check::execute(args, &output),
            Commands::Get(args) => get::execute(args, &output),
            Commands::Sync(args) => sync::execute(args, &output),
            Commands::Annotate(args) => annotate::execute(args, &output),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

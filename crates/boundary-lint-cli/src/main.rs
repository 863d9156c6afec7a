//! boundary-lint CLI tool.
//!
//! Usage:
//! ```bash
//! boundary-lint check [OPTIONS] <MANIFEST>
//! boundary-lint classify <PATH>...
//! boundary-lint list-elements
//! boundary-lint init
//! ```

use anyhow::Result;
use boundary_lint_core::Severity;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod manifest;

/// Architectural boundary checks over an import graph
#[derive(Parser)]
#[command(name = "boundary-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the import edges of a manifest
    Check {
        /// JSON manifest with `files` and `edges`
        manifest: PathBuf,

        /// Project root, used for config lookup and file discovery
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Lowest severity that fails the run
        #[arg(long, default_value = "error")]
        fail_on: FailOn,
    },

    /// Print the element type of each path
    Classify {
        /// Paths to classify
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List element types and rules
    ListElements,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Severity threshold for a failing exit code.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum FailOn {
    /// Fail on errors only.
    #[default]
    Error,
    /// Fail on warnings and errors.
    Warning,
    /// Fail on anything reported.
    Info,
}

impl From<FailOn> for Severity {
    fn from(value: FailOn) -> Self {
        match value {
            FailOn::Error => Self::Error,
            FailOn::Warning => Self::Warning,
            FailOn::Info => Self::Info,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            manifest,
            root,
            format,
            fail_on,
        } => {
            let source = config_resolver::resolve(&root, cli.config.as_deref());
            commands::check::run(&manifest, &root, format, fail_on.into(), &source)
        }
        Commands::Classify { paths } => {
            let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());
            commands::classify::run(&paths, &source)
        }
        Commands::ListElements => {
            let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());
            commands::list_elements::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

//! fsd-guard CLI tool.
//!
//! Usage:
//! ```bash
//! fsd-guard plan [OPTIONS] [PATH]
//! fsd-guard slices [PATH]
//! fsd-guard init
//! fsd-guard watch [PATH]
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Feature-Sliced Design convention engine: layer-aware aliases,
/// auto-import registration, and cross-import restriction rules
#[derive(Parser)]
#[command(name = "fsd-guard")]
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
    /// Run one setup cycle and print the resulting plan
    Plan {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List discovered slices per middle layer
    Slices {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Run one setup cycle, then re-plan on every qualifying
    /// directory creation
    Watch {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Output format for setup plans.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-rule compact format.
    Compact,
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
        .init();

    match cli.command {
        Commands::Plan { path, format } => {
            commands::plan::run(&path, format, cli.config.as_deref())
        }
        Commands::Slices { path } => commands::slices::run(&path, cli.config.as_deref()),
        Commands::Init { force } => commands::init::run(force),
        Commands::Watch { path } => commands::watch::run(&path, cli.config.as_deref()),
    }
}

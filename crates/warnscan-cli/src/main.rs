//! warnscan CLI tool.
//!
//! Usage:
//! ```bash
//! warnscan scan [OPTIONS] [PATH]
//! warnscan list-parsers
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Extracts and aggregates static-analysis warnings from build output
#[derive(Parser)]
#[command(name = "warnscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan build output files or a console log for warnings
    Scan {
        /// Workspace root patterns are expanded against
        #[arg(default_value = ".")]
        path: PathBuf,

        /// File pattern and parser group as 'PATTERN=GROUP' (repeatable)
        #[arg(short, long = "file", value_name = "PATTERN=GROUP")]
        files: Vec<String>,

        /// Parser group to run over the console log (repeatable)
        #[arg(long = "console", value_name = "GROUP")]
        console: Vec<String>,

        /// Path to the console log file
        #[arg(long, value_name = "PATH")]
        console_log: Option<PathBuf>,

        /// Derive module names from build descriptors in the workspace
        #[arg(short = 'm', long)]
        detect_modules: bool,

        /// Encoding used to read matched files (e.g. "ISO-8859-1")
        #[arg(short, long)]
        encoding: Option<String>,

        /// Output format
        #[arg(short = 'F', long, default_value = "text")]
        format: OutputFormat,
    },

    /// List available parser groups
    ListParsers,
}

/// Output format for scan results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-warning compact format.
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
        Commands::Scan {
            path,
            files,
            console,
            console_log,
            detect_modules,
            encoding,
            format,
        } => commands::scan::run(
            &path,
            &files,
            console,
            console_log,
            detect_modules,
            encoding,
            format,
        ),
        Commands::ListParsers => {
            commands::list_parsers::run();
            Ok(())
        }
    }
}

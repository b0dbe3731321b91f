//! Scan command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use warnscan_core::Scanner;
use warnscan_parsers::builtin_registry;

use super::output;
use crate::OutputFormat;

/// Runs the scan command.
pub fn run(
    path: &Path,
    files: &[String],
    console: Vec<String>,
    console_log: Option<PathBuf>,
    detect_modules: bool,
    encoding: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut builder = Scanner::builder()
        .workspace(path)
        .detect_modules(detect_modules);

    for spec in files {
        let (pattern, group) = split_file_spec(spec)?;
        builder = builder.file_pattern(pattern, group);
    }
    for group in console {
        builder = builder.console_parser(group);
    }
    if let Some(log) = console_log {
        builder = builder.console_log(log);
    }
    if let Some(label) = encoding {
        builder = builder.encoding(label);
    }

    let scanner = builder.build().context("Failed to configure the scan")?;

    tracing::info!("Scanning {} with {} pattern(s)", path.display(), files.len());

    let result = scanner.scan(&builtin_registry()).context("Scan failed")?;

    output::print(&result, format)?;

    // Exit with error code if any warnings were found
    if result.number_of_warnings() > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Splits a 'PATTERN=GROUP' argument into its two halves.
fn split_file_spec(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('=') {
        Some((pattern, group)) if !pattern.is_empty() && !group.is_empty() => {
            Ok((pattern, group))
        }
        _ => bail!("invalid --file value '{spec}', expected 'PATTERN=GROUP'"),
    }
}

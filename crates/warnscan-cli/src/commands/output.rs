//! Shared output formatting for scan results.

use anyhow::Result;
use warnscan_core::{ParserResult, Priority, LINE_BREAK};

use crate::OutputFormat;

/// Print a scan result in the specified format.
pub fn print(result: &ParserResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &ParserResult) {
    for line in result.log_messages() {
        println!("[warnscan] {line}");
    }
    if !result.log_messages().is_empty() {
        println!();
    }

    for annotation in result.sorted_annotations() {
        let priority_indicator = match annotation.priority() {
            Priority::High => "\x1b[31mhigh\x1b[0m",
            Priority::Normal => "\x1b[33mnormal\x1b[0m",
            Priority::Low => "\x1b[34mlow\x1b[0m",
        };

        let location = if annotation.file_name().is_empty() {
            String::from("<console>")
        } else {
            format!("{}:{}", annotation.file_name(), annotation.line_number())
        };

        println!("{} [{}] at {}", annotation.category(), annotation.kind(), location);
        if !annotation.module_name().is_empty() {
            println!("  module: {}", annotation.module_name());
        }
        println!(
            "  {}: {}",
            priority_indicator,
            annotation.message().replace(LINE_BREAK, "\n    ")
        );
        println!();
    }

    let color = if result.number_of_warnings() > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    println!(
        "{}Found {} warning(s)\x1b[0m",
        color,
        result.number_of_warnings()
    );
}

fn print_json(result: &ParserResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &ParserResult) {
    for annotation in result.sorted_annotations() {
        println!("{annotation}");
    }
}

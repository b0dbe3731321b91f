//! List parsers command implementation.

use warnscan_parsers::all_parsers;

/// Runs the list-parsers command.
pub fn run() {
    println!("Available parsers:\n");
    println!("{:<20} {:<20} Trend label", "Id", "Group");
    println!("{}", "-".repeat(60));

    for parser in all_parsers() {
        println!(
            "{:<20} {:<20} {}",
            parser.id(),
            parser.group(),
            parser.trend_name()
        );
    }

    println!("\nUse the group name in --file and --console, e.g.:");
    println!("  warnscan scan --file '**/*.log=Java Compiler'");
    println!("  warnscan scan --console 'Java Exceptions' --console-log build.log");
}

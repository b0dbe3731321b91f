//! # warnscan-parsers
//!
//! Built-in warning parsers for warnscan and the default registry wiring
//! them up.
//!
//! Parser groups:
//!
//! - "Java Exceptions" — [`ExceptionParser`], a stateful multi-line scanner
//!   for stack traces
//! - "Java Compiler" — [`JavacParser`] and [`AntJavacParser`], two variants
//!   answering to one group
//! - "IDEA Inspections" — [`IdeaInspectionParser`], an XML report reader
//!
//! The registry built by [`builtin_registry`] is an explicit table populated
//! once at startup; extend it by registering further factories before
//! handing it to the scan driver.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ant_javac;
mod exception;
mod idea;
mod javac;

pub use ant_javac::AntJavacParser;
pub use exception::ExceptionParser;
pub use idea::IdeaInspectionParser;
pub use javac::JavacParser;

use warnscan_core::{ParserBox, ParserRegistry};

/// Group name of the exception stack-trace parser.
pub const JAVA_EXCEPTIONS: &str = "Java Exceptions";

/// Group name shared by the `javac` parser variants.
pub const JAVA_COMPILER: &str = "Java Compiler";

/// Group name of the IDEA inspections report parser.
pub const IDEA_INSPECTIONS: &str = "IDEA Inspections";

/// Builds the registry of all built-in parsers.
#[must_use]
pub fn builtin_registry() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(JAVA_EXCEPTIONS, ExceptionParser::new);
    registry.register(JAVA_COMPILER, JavacParser::new);
    registry.register(JAVA_COMPILER, AntJavacParser::new);
    registry.register(IDEA_INSPECTIONS, IdeaInspectionParser::new);
    registry
}

/// Returns one instance of every built-in parser, for listing.
#[must_use]
pub fn all_parsers() -> Vec<ParserBox> {
    vec![
        Box::new(ExceptionParser::new()),
        Box::new(JavacParser::new()),
        Box::new(AntJavacParser::new()),
        Box::new(IdeaInspectionParser::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_resolves_every_group() {
        let registry = builtin_registry();
        assert_eq!(registry.resolve(JAVA_EXCEPTIONS).len(), 1);
        assert_eq!(registry.resolve(JAVA_COMPILER).len(), 2);
        assert_eq!(registry.resolve(IDEA_INSPECTIONS).len(), 1);
        assert!(registry.resolve("No Such Group").is_empty());
    }

    #[test]
    fn java_compiler_variants_resolve_in_registration_order() {
        let registry = builtin_registry();
        let parsers = registry.resolve(JAVA_COMPILER);
        assert_eq!(parsers[0].id(), "javac");
        assert_eq!(parsers[1].id(), "ant-javac");
    }

    #[test]
    fn listed_parsers_match_registered_groups() {
        let registry = builtin_registry();
        for parser in all_parsers() {
            assert!(
                registry.groups().contains(&parser.group()),
                "parser {} has no registered group",
                parser.id()
            );
        }
    }
}

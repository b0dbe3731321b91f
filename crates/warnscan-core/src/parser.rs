//! The parser capability trait.

use crate::annotation::Annotation;
use std::collections::HashSet;
use std::io::BufRead;

/// A warning parser turning raw build output into annotations.
///
/// Implementations may be stateless (a regex applied per line) or stateful
/// (a line scanner accumulating a multi-line warning). Any parse-time state
/// must live in locals of a single [`parse`](WarningParser::parse) call so
/// that instances never leak accumulation state between inputs.
///
/// # Contract
///
/// A parser must never fail on malformed or unexpected input lines;
/// unrecognized lines are simply not emitted as annotations. Only a genuinely
/// unreadable stream is an error.
///
/// # Example
///
/// ```ignore
/// use warnscan_core::{Annotation, WarningParser};
///
/// pub struct MakeErrorParser;
///
/// impl WarningParser for MakeErrorParser {
///     fn id(&self) -> &'static str { "make-error" }
///     fn group(&self) -> &'static str { "GNU Make" }
///
///     fn parse(
///         &self,
///         input: &mut dyn std::io::BufRead,
///         module_name: &str,
///     ) -> std::io::Result<std::collections::HashSet<Annotation>> {
///         // match `make: *** ...` lines and emit one annotation each
///         # unimplemented!()
///     }
/// }
/// ```
pub trait WarningParser: Send + Sync {
    /// Returns the unique internal key of this parser (e.g. "java-exceptions").
    fn id(&self) -> &'static str;

    /// Returns the group name this parser answers to (e.g. "Java Compiler").
    ///
    /// Several parser variants may share one group; all of them are applied
    /// to each input and their results unioned.
    fn group(&self) -> &'static str;

    /// Returns the label used by collaborators for result links.
    fn link_name(&self) -> &'static str {
        self.group()
    }

    /// Returns the label used by collaborators for trend reports.
    fn trend_name(&self) -> &'static str {
        self.group()
    }

    /// Parses the given stream and returns the detected annotations.
    ///
    /// `module_name` is the logical module the input belongs to; parsers
    /// stamp it on every annotation they emit (it may be empty).
    ///
    /// # Errors
    ///
    /// Returns an error only if the stream itself cannot be read.
    fn parse(
        &self,
        input: &mut dyn BufRead,
        module_name: &str,
    ) -> std::io::Result<HashSet<Annotation>>;
}

/// Type alias for boxed `WarningParser` trait objects.
pub type ParserBox = Box<dyn WarningParser>;

/// A factory producing a fresh parser instance per resolution.
///
/// The registry stores factories rather than instances so that stateful
/// parsers are never shared across concurrent file parses.
pub type ParserFactory = Box<dyn Fn() -> ParserBox + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestParser;

    impl WarningParser for TestParser {
        fn id(&self) -> &'static str {
            "test-parser"
        }

        fn group(&self) -> &'static str {
            "Test Group"
        }

        fn parse(
            &self,
            _input: &mut dyn BufRead,
            _module_name: &str,
        ) -> std::io::Result<HashSet<Annotation>> {
            Ok(HashSet::new())
        }
    }

    #[test]
    fn labels_default_to_the_group_name() {
        let parser = TestParser;
        assert_eq!(parser.link_name(), "Test Group");
        assert_eq!(parser.trend_name(), "Test Group");
    }
}

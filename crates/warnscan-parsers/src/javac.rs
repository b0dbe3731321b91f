//! Parser for plain `javac` warning output.

use regex::Regex;
use std::collections::HashSet;
use std::io::BufRead;
use std::sync::LazyLock;
use warnscan_core::{Annotation, WarningParser};

use crate::JAVA_COMPILER;

/// One `javac` warning line: an optional `[WARNING]` prefix, the source file,
/// a line number, the `warning:` marker, an optional bracketed category tag,
/// and the message.
static WARNING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[WARNING\]\s+)?([\w./\\-]+\.java):(\d+):\s*warning:\s*(?:\[(\w+)\])?\s*(.*)$")
        .unwrap()
});

/// Parses warnings emitted by the `javac` compiler, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavacParser;

impl JavacParser {
    /// Creates a new javac parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WarningParser for JavacParser {
    fn id(&self) -> &'static str {
        "javac"
    }

    fn group(&self) -> &'static str {
        JAVA_COMPILER
    }

    fn parse(
        &self,
        input: &mut dyn BufRead,
        module_name: &str,
    ) -> std::io::Result<HashSet<Annotation>> {
        let mut annotations = HashSet::new();
        for line in input.lines() {
            let line = line?;
            if let Some(mut annotation) = parse_warning_line(&WARNING, "Java Compiler", &line) {
                annotation.set_module_name(module_name);
                annotations.insert(annotation);
            }
        }
        Ok(annotations)
    }
}

/// Shared capture-to-annotation mapping for the javac-style parsers.
///
/// Group 1 is the file, group 2 the line number, group 3 the optional
/// category tag, group 4 the message.
pub(crate) fn parse_warning_line(pattern: &Regex, kind: &str, line: &str) -> Option<Annotation> {
    let captures = pattern.captures(line)?;
    let file = captures.get(1)?.as_str();
    let line_number: i64 = captures.get(2)?.as_str().parse().ok()?;
    let category = captures
        .get(3)
        .map(|tag| capitalize(tag.as_str()))
        .unwrap_or_default();
    let message = captures.get(4).map_or("", |m| m.as_str());

    Annotation::new(file, line_number, message, kind, category).ok()
}

/// Upper-cases the first character of a warning tag ("deprecation" →
/// "Deprecation") for display as a category.
fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

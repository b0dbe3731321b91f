//! Parser for `javac` warnings wrapped in Ant task output.

use regex::Regex;
use std::collections::HashSet;
use std::io::BufRead;
use std::sync::LazyLock;
use warnscan_core::{Annotation, WarningParser};

use crate::javac::parse_warning_line;
use crate::JAVA_COMPILER;

/// A `javac` warning line as logged by the Ant `<javac>` task, i.e. prefixed
/// with the task name.
static WARNING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[javac\]\s+([\w./\\-]+\.java):(\d+):\s*warning:\s*(?:\[(\w+)\])?\s*(.*)$")
        .unwrap()
});

/// Parses `javac` warnings from Ant build logs.
///
/// Registered under the same "Java Compiler" group as [`crate::JavacParser`];
/// both variants are applied to each input and their results unioned.
#[derive(Debug, Default, Clone, Copy)]
pub struct AntJavacParser;

impl AntJavacParser {
    /// Creates a new Ant javac parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WarningParser for AntJavacParser {
    fn id(&self) -> &'static str {
        "ant-javac"
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

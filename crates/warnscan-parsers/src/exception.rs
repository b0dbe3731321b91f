//! Stateful parser for exception stack traces in build output.
//!
//! A stack trace spans many lines with a variable-length continuation, so a
//! single-line regex cannot capture it. This parser runs a small line scanner
//! instead: idle until a header line opens a trace, then accumulating
//! continuation lines into one pending annotation until a foreign line (or
//! the end of the stream) closes it.

use regex::Regex;
use std::collections::HashSet;
use std::io::BufRead;
use std::sync::LazyLock;
use warnscan_core::{Annotation, WarningParser};

use crate::JAVA_EXCEPTIONS;

/// First line of a stack trace: an optional bracketed framework tag, a
/// qualified exception-type token, then a colon and free text.
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*(\[testng\])?\s*[\w.]*Exception[\w.]*:.*$").unwrap());

/// Follow-up line of a stack trace: an optional framework tag, then one of
/// `at `, `Caused by:`, or the `...` elision marker, then a token.
static CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\[testng\])?\s*(at|Caused by:|\.\.\.) [\w<>.]+.*$").unwrap());

/// Parses exception stack traces out of otherwise unstructured build output.
///
/// Emitted annotations have no file name (traces do not self-report a source
/// file at the header line), the 0-based index of the header line as line
/// number, and the full trace joined with [`warnscan_core::LINE_BREAK`] as
/// message.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExceptionParser;

impl ExceptionParser {
    /// Creates a new exception parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WarningParser for ExceptionParser {
    fn id(&self) -> &'static str {
        "java-exceptions"
    }

    fn group(&self) -> &'static str {
        JAVA_EXCEPTIONS
    }

    fn link_name(&self) -> &'static str {
        "Exceptions"
    }

    fn trend_name(&self) -> &'static str {
        "Exceptions"
    }

    fn parse(
        &self,
        input: &mut dyn BufRead,
        module_name: &str,
    ) -> std::io::Result<HashSet<Annotation>> {
        let mut annotations = HashSet::new();
        // Accumulation state: `Some` while a trace is being collected.
        let mut pending: Option<Annotation> = None;

        for (index, line) in input.lines().enumerate() {
            let line = line?;

            // While accumulating, the continuation check takes precedence
            // over starting a new header on the same line.
            if pending.is_some() && CONTINUATION.is_match(&line) {
                if let Some(current) = pending.as_mut() {
                    current.append_line(&line);
                }
                continue;
            }

            // The trace (if any) ended before this line; flush it and
            // re-examine the same line as a potential new header.
            if let Some(done) = pending.take() {
                annotations.insert(done);
            }

            if HEADER.is_match(&line) {
                let line_number = i64::try_from(index).unwrap_or(i64::MAX);
                if let Ok(mut annotation) =
                    Annotation::new("", line_number, &line, "Exception", "Exceptions")
                {
                    annotation.set_module_name(module_name);
                    pending = Some(annotation);
                }
            }
            // A continuation line with no pending trace, and any other
            // unrecognized line, produces nothing.
        }

        // Do not drop a trailing unterminated trace.
        if let Some(done) = pending.take() {
            annotations.insert(done);
        }

        Ok(annotations)
    }
}

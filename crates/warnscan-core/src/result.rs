//! The aggregate result of a scan.

use crate::annotation::Annotation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Merged outcome of one scan invocation.
///
/// Owns the deduplicated annotation set, the ordered log-line sequence
/// appended to while the scan runs, and the warning count of a previous
/// reference scan (maintained by the trend collaborator; this engine only
/// stores it). The reported warning count is always derived from the set,
/// so it cannot drift from the deduplicated contents.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ParserResult {
    annotations: HashSet<Annotation>,
    log_messages: Vec<String>,
    reference_count: usize,
}

impl ParserResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single annotation; exact duplicates collapse to one.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.insert(annotation);
    }

    /// Adds a batch of annotations produced by one parser run.
    pub fn add_annotations(&mut self, annotations: impl IntoIterator<Item = Annotation>) {
        self.annotations.extend(annotations);
    }

    /// Appends one line to the log-message sequence.
    pub fn log(&mut self, message: impl Into<String>) {
        self.log_messages.push(message.into());
    }

    /// Merges another per-pattern or per-module result into this one.
    ///
    /// Annotations are unioned with set semantics; log lines are appended in
    /// call order.
    pub fn merge(&mut self, other: Self) {
        self.annotations.extend(other.annotations);
        self.log_messages.extend(other.log_messages);
    }

    /// Number of warnings in this scan, equal to the size of the
    /// deduplicated annotation set.
    #[must_use]
    pub fn number_of_warnings(&self) -> usize {
        self.annotations.len()
    }

    /// The merged annotation set.
    #[must_use]
    pub fn annotations(&self) -> &HashSet<Annotation> {
        &self.annotations
    }

    /// Annotations sorted by file name, then line number, for deterministic
    /// rendering.
    #[must_use]
    pub fn sorted_annotations(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<&Annotation> = self.annotations.iter().collect();
        sorted.sort_by(|a, b| {
            a.file_name()
                .cmp(b.file_name())
                .then(a.line_number().cmp(&b.line_number()))
                .then(a.message().cmp(b.message()))
        });
        sorted
    }

    /// The ordered log-line sequence accumulated during the scan.
    #[must_use]
    pub fn log_messages(&self) -> &[String] {
        &self.log_messages
    }

    /// Warning count of the previous reference scan.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.reference_count
    }

    /// Stores the warning count of the previous reference scan.
    pub fn set_reference_count(&mut self, count: usize) {
        self.reference_count = count;
    }

    /// Warning delta against the reference scan (positive means new warnings).
    #[must_use]
    pub fn delta(&self) -> i64 {
        let current = i64::try_from(self.number_of_warnings()).unwrap_or(i64::MAX);
        let reference = i64::try_from(self.reference_count).unwrap_or(i64::MAX);
        current - reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(file: &str, line: i64, message: &str) -> Annotation {
        Annotation::new(file, line, message, "warning", "Compiler").unwrap()
    }

    #[test]
    fn count_equals_set_size_after_dedup() {
        let mut result = ParserResult::new();
        result.add_annotation(make("a.java", 1, "msg"));
        result.add_annotation(make("a.java", 1, "msg"));
        result.add_annotation(make("b.java", 2, "other"));

        assert_eq!(result.number_of_warnings(), 2);
        assert_eq!(result.number_of_warnings(), result.annotations().len());
    }

    #[test]
    fn merge_unions_annotations_and_appends_logs() {
        let mut first = ParserResult::new();
        first.add_annotation(make("a.java", 1, "msg"));
        first.log("pattern one");

        let mut second = ParserResult::new();
        second.add_annotation(make("a.java", 1, "msg"));
        second.add_annotation(make("c.java", 3, "third"));
        second.log("pattern two");

        first.merge(second);

        assert_eq!(first.number_of_warnings(), 2);
        assert_eq!(first.log_messages(), ["pattern one", "pattern two"]);
    }

    #[test]
    fn sorted_annotations_order_by_file_then_line() {
        let mut result = ParserResult::new();
        result.add_annotation(make("b.java", 1, "msg"));
        result.add_annotation(make("a.java", 9, "msg"));
        result.add_annotation(make("a.java", 2, "msg"));

        let sorted = result.sorted_annotations();
        let keys: Vec<(&str, usize)> = sorted
            .iter()
            .map(|a| (a.file_name(), a.line_number()))
            .collect();
        assert_eq!(keys, [("a.java", 2), ("a.java", 9), ("b.java", 1)]);
    }

    #[test]
    fn delta_against_reference_count() {
        let mut result = ParserResult::new();
        result.add_annotation(make("a.java", 1, "msg"));
        result.set_reference_count(3);
        assert_eq!(result.delta(), -2);
        assert_eq!(result.reference_count(), 3);
    }
}

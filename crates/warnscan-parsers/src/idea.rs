//! Parser for IDEA inspection XML reports.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::io::{BufRead, Read};
use tracing::debug;
use warnscan_core::{Annotation, Priority, WarningParser};

use crate::IDEA_INSPECTIONS;

/// Prefix IDEA puts in front of workspace-relative file references.
const PROJECT_DIR_PREFIX: &str = "file://$PROJECT_DIR$/";

/// Which child element of `<problem>` is currently being read.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    File,
    Line,
    ProblemClass,
    Description,
}

/// One `<problem>` being assembled from the report.
#[derive(Default)]
struct PendingProblem {
    file: String,
    line: String,
    problem_class: String,
    description: String,
    priority: Priority,
}

impl PendingProblem {
    fn into_annotation(self, module_name: &str) -> Option<Annotation> {
        let file = self.file.trim();
        let file = file.strip_prefix(PROJECT_DIR_PREFIX).unwrap_or(file);
        let line_number: i64 = self.line.trim().parse().unwrap_or(0);

        let mut annotation = Annotation::new(
            file,
            line_number,
            self.description.trim(),
            "IDEA Inspection",
            self.problem_class.trim(),
        )
        .ok()?
        .with_priority(self.priority);
        annotation.set_module_name(module_name);
        Some(annotation)
    }
}

/// Parses the `<problems>` report written by IDEA's inspection runner.
///
/// Severity maps ERROR to [`Priority::High`], WARNING to
/// [`Priority::Normal`], anything else to [`Priority::Low`]. A malformed
/// report terminates the scan of that stream, keeping whatever was collected
/// up to that point.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdeaInspectionParser;

impl IdeaInspectionParser {
    /// Creates a new IDEA inspections parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WarningParser for IdeaInspectionParser {
    fn id(&self) -> &'static str {
        "idea-inspections"
    }

    fn group(&self) -> &'static str {
        IDEA_INSPECTIONS
    }

    fn parse(
        &self,
        input: &mut dyn BufRead,
        module_name: &str,
    ) -> std::io::Result<HashSet<Annotation>> {
        let mut content = String::new();
        input.read_to_string(&mut content)?;

        let mut reader = Reader::from_str(&content);

        let mut annotations = HashSet::new();
        let mut pending: Option<PendingProblem> = None;
        let mut field: Option<Field> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) => match element.name().as_ref() {
                    b"problem" => {
                        pending = Some(PendingProblem::default());
                        field = None;
                    }
                    b"file" if pending.is_some() => field = Some(Field::File),
                    b"line" if pending.is_some() => field = Some(Field::Line),
                    b"problem_class" if pending.is_some() => {
                        field = Some(Field::ProblemClass);
                        if let Some(problem) = pending.as_mut() {
                            problem.priority = severity_attribute(&element);
                        }
                    }
                    b"description" if pending.is_some() => field = Some(Field::Description),
                    _ => field = None,
                },
                Ok(Event::Text(text)) => {
                    if let (Some(problem), Some(target)) = (pending.as_mut(), field) {
                        if let Ok(value) = text.unescape() {
                            let slot = match target {
                                Field::File => &mut problem.file,
                                Field::Line => &mut problem.line,
                                Field::ProblemClass => &mut problem.problem_class,
                                Field::Description => &mut problem.description,
                            };
                            slot.push_str(&value);
                        }
                    }
                }
                Ok(Event::End(element)) => {
                    if element.name().as_ref() == b"problem" {
                        if let Some(done) = pending.take() {
                            if let Some(annotation) = done.into_annotation(module_name) {
                                annotations.insert(annotation);
                            }
                        }
                    }
                    field = None;
                }
                Ok(Event::Eof) => break,
                Err(error) => {
                    // Keep what was collected; unrecognized trailing content
                    // is not an error.
                    debug!("Stopping IDEA report parse on malformed XML: {error}");
                    break;
                }
                Ok(_) => {}
            }
        }

        Ok(annotations)
    }
}

/// Maps the `severity` attribute of `<problem_class>` to a priority.
fn severity_attribute(element: &quick_xml::events::BytesStart<'_>) -> Priority {
    let severity = element
        .attributes()
        .filter_map(Result::ok)
        .find(|attribute| attribute.key.as_ref() == b"severity")
        .map(|attribute| String::from_utf8_lossy(&attribute.value).into_owned());

    match severity.as_deref() {
        Some("ERROR") => Priority::High,
        Some("WARNING") => Priority::Normal,
        _ => Priority::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<problems>
  <problem>
    <file>file://$PROJECT_DIR$/src/Main.java</file>
    <line>42</line>
    <problem_class severity="WARNING">Unused declaration</problem_class>
    <description>Method 'frobnicate' is never used</description>
  </problem>
  <problem>
    <file>file://$PROJECT_DIR$/src/Other.java</file>
    <line>7</line>
    <problem_class severity="ERROR">Constant conditions</problem_class>
    <description>Condition is always false</description>
  </problem>
</problems>
"#;

    fn parse(content: &str) -> HashSet<Annotation> {
        IdeaInspectionParser::new()
            .parse(&mut Cursor::new(content.as_bytes()), "")
            .unwrap()
    }

    #[test]
    fn problems_become_annotations_with_mapped_severity() {
        let annotations = parse(REPORT);
        assert_eq!(annotations.len(), 2);

        let unused = annotations
            .iter()
            .find(|a| a.file_name() == "src/Main.java")
            .unwrap();
        assert_eq!(unused.line_number(), 42);
        assert_eq!(unused.category(), "Unused declaration");
        assert_eq!(unused.message(), "Method 'frobnicate' is never used");
        assert_eq!(unused.priority(), Priority::Normal);

        let constant = annotations
            .iter()
            .find(|a| a.file_name() == "src/Other.java")
            .unwrap();
        assert_eq!(constant.priority(), Priority::High);
    }

    #[test]
    fn unknown_severity_maps_to_low() {
        let report = r#"<problems>
  <problem>
    <file>src/Main.java</file>
    <line>1</line>
    <problem_class severity="TYPO">Spelling</problem_class>
    <description>Typo in word</description>
  </problem>
</problems>"#;
        let annotations = parse(report);
        assert_eq!(annotations.iter().next().unwrap().priority(), Priority::Low);
    }

    #[test]
    fn truncated_report_keeps_what_was_collected() {
        let truncated = r#"<problems>
  <problem>
    <file>src/Main.java</file>
    <line>42</line>
    <problem_class severity="WARNING">Unused declaration</problem_class>
    <description>Method is never used</description>
  </problem>
  <problem>
    <file>src/Broken.java</file>
    <line>9</line"#;
        let annotations = parse(truncated);
        assert_eq!(annotations.len(), 1);
    }

    #[test]
    fn plain_text_input_produces_nothing() {
        assert!(parse("this is not an inspection report\n").is_empty());
    }
}

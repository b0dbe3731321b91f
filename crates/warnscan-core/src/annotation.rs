//! The canonical warning annotation model.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Marker used to join multi-line annotation messages for later rendering.
pub const LINE_BREAK: &str = "<br>";

/// Errors raised when constructing an [`Annotation`].
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The supplied line number was negative.
    #[error("line number must not be negative, got {0}")]
    NegativeLineNumber(i64),
}

/// Priority of a warning annotation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority finding.
    Low,
    /// Normal priority finding.
    #[default]
    Normal,
    /// High priority finding.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One normalized warning detected by a parser.
///
/// An annotation is immutable after construction except for the module name,
/// which the module resolver assigns once after parsing completes.
///
/// Two annotations are considered duplicates when file name, line number,
/// message, kind, and category are all equal; priority and module name do not
/// participate in identity. Storing annotations in a set therefore collapses
/// exact duplicates to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    file_name: String,
    line_number: usize,
    message: String,
    kind: String,
    category: String,
    priority: Priority,
    module_name: String,
}

impl Annotation {
    /// Creates a new annotation with [`Priority::Normal`].
    ///
    /// An empty file name is permitted for findings without an identifiable
    /// source file (e.g. exceptions lifted from the console log). A line
    /// number of 0 means "no specific line".
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::NegativeLineNumber`] if `line_number` is
    /// negative.
    pub fn new(
        file_name: impl Into<String>,
        line_number: i64,
        message: impl Into<String>,
        kind: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, AnnotationError> {
        if line_number < 0 {
            return Err(AnnotationError::NegativeLineNumber(line_number));
        }
        #[allow(clippy::cast_sign_loss)]
        let line_number = line_number as usize;

        Ok(Self {
            file_name: file_name.into(),
            line_number,
            message: message.into(),
            kind: kind.into(),
            category: category.into(),
            priority: Priority::Normal,
            module_name: String::new(),
        })
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Appends a further message line, joined with [`LINE_BREAK`].
    pub fn append_line(&mut self, line: &str) {
        self.message.push_str(LINE_BREAK);
        self.message.push_str(line);
    }

    /// Path of the file the warning refers to; empty when unknown.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Line number of the warning; 0 means "no specific line".
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Warning message, possibly multi-line (joined with [`LINE_BREAK`]).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fine-grained classification, e.g. "Exception".
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Coarse grouping, e.g. "Exceptions".
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Priority of the warning.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Logical module the warning belongs to; empty when undetected.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Assigns the module name. Called once by the module resolver after
    /// parsing completes.
    pub fn set_module_name(&mut self, module_name: impl Into<String>) {
        self.module_name = module_name.into();
    }
}

// Identity is structural over the five detection fields only. Priority and
// module name are metadata and must not split otherwise identical findings.
impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.file_name == other.file_name
            && self.line_number == other.line_number
            && self.message == other.message
            && self.kind == other.kind
            && self.category == other.category
    }
}

impl Eq for Annotation {}

impl Hash for Annotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_name.hash(state);
        self.line_number.hash(state);
        self.message.hash(state);
        self.kind.hash(state);
        self.category.hash(state);
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.file_name, self.line_number, self.priority, self.category, self.message
        )
    }
}

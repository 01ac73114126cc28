//! The core diagnostic type for the Trellis error system.
//!
//! A [`Diagnostic`] represents a single error, warning or note with an
//! optional error code, a 1-based position, labeled byte spans, help text
//! and the document it was found in.

use std::{cmp::Ordering, fmt};

use trellis_core::{Position, Span};

use crate::error::{Severity, error_code::ErrorCode, label::Label};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E201]: `formatPrise` is not defined
///   --> shop.trellis:12:5
///    |
/// 12 |     => formatPrise
///    |        ^^^^^^^^^^^ not found
///    |
///    = help: did you mean `formatPrice`?
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    position: Position,
    labels: Vec<Label>,
    help: Option<String>,
    document: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use trellis_parser::error::{Diagnostic, ErrorCode};
    /// # use trellis_core::{Position, Span};
    ///
    /// let diag = Diagnostic::error("`Foo` is not defined")
    ///     .with_code(ErrorCode::E201)
    ///     .with_position(Position::new(3, 5))
    ///     .with_label(Span::new(20..23), "not found")
    ///     .with_help("did you mean `Bar`?");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the 1-based position the diagnostic points at.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Get the document the diagnostic refers to; `None` for the root document.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the document.
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Set the document unless one is already set.
    pub fn or_document(mut self, document: Option<&str>) -> Self {
        if self.document.is_none() {
            self.document = document.map(str::to_string);
        }
        self
    }

    /// Order by document (root first), then line, then column.
    pub fn cmp_location(&self, other: &Diagnostic) -> Ordering {
        self.document
            .cmp(&other.document)
            .then_with(|| self.position.line().cmp(&other.position.line()))
            .then_with(|| self.position.column().cmp(&other.position.column()))
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            position: Position::start(),
            labels: Vec::new(),
            help: None,
            document: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

//! Collector for accumulating diagnostics during a processing phase.
//!
//! The [`DiagnosticCollector`] allows phases to report multiple errors
//! and warnings instead of failing on the first one encountered.

use crate::error::Diagnostic;

/// A collector for accumulating diagnostics during a processing phase.
///
/// # Example
///
/// ```
/// # use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// # use trellis_core::Position;
///
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::error("`bar` is not defined")
///         .with_code(ErrorCode::E201)
///         .with_position(Position::new(7, 5)),
/// );
/// collector.emit(
///     Diagnostic::error("`foo` is not defined")
///         .with_code(ErrorCode::E201)
///         .with_position(Position::new(2, 5)),
/// );
///
/// let diagnostics = collector.finish();
/// assert_eq!(diagnostics[0].message(), "`foo` is not defined");
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// The diagnostic is added to the collection and if it's an error,
    /// the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Emit every diagnostic of `diagnostics`.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// Whether an error-severity diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Number of diagnostics emitted so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Finish collection, returning every diagnostic ordered by document,
    /// line and column. Diagnostics at the same location keep emission order.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by(Diagnostic::cmp_location);
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Position;

    #[test]
    fn test_collector_new_is_empty() {
        let collector = DiagnosticCollector::new();
        assert!(collector.is_empty());
        assert!(!collector.has_errors());
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_warning_is_not_error() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("test warning"));

        assert!(!collector.has_errors());
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_collector_tracks_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.extend([Diagnostic::warning("w"), Diagnostic::error("e")]);

        assert!(collector.has_errors());
    }

    #[test]
    fn test_finish_is_stable_at_same_location() {
        let mut collector = DiagnosticCollector::new();
        let at = Position::new(4, 1);
        collector.emit(Diagnostic::error("first").with_position(at));
        collector.emit(Diagnostic::error("early").with_position(Position::new(1, 1)));
        collector.emit(Diagnostic::warning("second").with_position(at));

        let messages: Vec<_> = collector
            .finish()
            .iter()
            .map(|d| d.message().to_string())
            .collect();
        assert_eq!(messages, ["early", "first", "second"]);
    }
}

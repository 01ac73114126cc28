//! Diagnostic system for the Trellis pipeline.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - 1-based positions plus labelled byte spans for rich rendering
//! - Severity levels (error, warning, info)
//! - A collector for accumulating diagnostics across a whole pass
//!
//! # Overview
//!
//! Every stage (scanning, linking, resolving, validating) reports problems as
//! [`Diagnostic`] values instead of failing. A [`DiagnosticCollector`]
//! accumulates them and hands them back ordered by document and position.
//!
//! # Example
//!
//! ```
//! # use trellis_parser::error::{Diagnostic, ErrorCode};
//! # use trellis_core::{Position, Span};
//!
//! let diag = Diagnostic::error("entity `Store` is defined multiple times")
//!     .with_code(ErrorCode::E215)
//!     .with_position(Position::new(10, 1))
//!     .with_label(Span::new(120..140), "duplicate definition")
//!     .with_secondary_label(Span::new(40..60), "first defined here")
//!     .with_help("rename one of the definitions");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;

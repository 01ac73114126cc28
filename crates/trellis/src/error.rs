//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`] which wraps
//! the failures of loading, validating and converting a model.

use std::io;

use thiserror::Error;

use crate::{convert::ConvertError, report::ValidationReport};

/// The main error type for Trellis operations.
///
/// # Diagnostic Variants
///
/// The `Invalid` variant carries every diagnostic of the failed model
/// together with the root source text, so callers can render them with
/// source context.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{report}")]
    Invalid {
        report: ValidationReport,
        src: String,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl TrellisError {
    /// Create a new `Invalid` error with the associated source code.
    pub fn new_invalid(report: ValidationReport, src: impl Into<String>) -> Self {
        Self::Invalid {
            report,
            src: src.into(),
        }
    }
}

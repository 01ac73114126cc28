//! Configuration types for validation and conversion.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining both sections.
//! - [`ValidationConfig`] - Controls "did you mean" suggestions.
//! - [`ConvertConfig`] - Controls the layout of rendered documents.
//!
//! # Example
//!
//! ```
//! # use trellis::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validation().suggestions());
//! assert_eq!(config.convert().indent(), 2);
//! ```

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Validation section.
    #[serde(default)]
    validation: ValidationConfig,

    /// Conversion section.
    #[serde(default)]
    convert: ConvertConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(validation: ValidationConfig, convert: ConvertConfig) -> Self {
        Self {
            validation,
            convert,
        }
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the conversion configuration.
    pub fn convert(&self) -> &ConvertConfig {
        &self.convert
    }
}

/// Suggestion settings for unresolved references.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Whether unresolved references get a "did you mean" suggestion.
    suggestions: bool,

    /// Minimum similarity, between 0 and 1, for a name to be suggested.
    similarity_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            suggestions: true,
            similarity_threshold: 0.6,
        }
    }
}

impl ValidationConfig {
    /// Creates a new [`ValidationConfig`]. The threshold is clamped to `0.0..=1.0`.
    pub fn new(suggestions: bool, similarity_threshold: f64) -> Self {
        Self {
            suggestions,
            similarity_threshold: similarity_threshold.clamp(0.0, 1.0),
        }
    }

    /// Returns whether suggestions are enabled.
    pub fn suggestions(&self) -> bool {
        self.suggestions
    }

    /// Returns the similarity threshold, clamped to `0.0..=1.0`.
    pub fn similarity_threshold(&self) -> f64 {
        if self.similarity_threshold.is_nan() {
            return 1.0;
        }
        self.similarity_threshold.clamp(0.0, 1.0)
    }
}

/// Layout settings for rendered documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Spaces before continuation and property lines.
    indent: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl ConvertConfig {
    /// Creates a new [`ConvertConfig`]. An indent of zero is raised to one,
    /// since shortform continuations are recognized by their indentation.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: indent.max(1),
        }
    }

    /// Returns the indent width, at least one space.
    pub fn indent(&self) -> usize {
        self.indent.max(1)
    }
}

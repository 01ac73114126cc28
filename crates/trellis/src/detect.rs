//! Detection of the dominant surface syntax of a document.
//!
//! Every column-1 line that opens a declaration is classified with the shared
//! grammar table as shortform or longform; everything else is neutral. The
//! verdict is computed from the two counts:
//!
//! - no declarations at all: shortform, confidence 0.5
//! - only one style present: that style, confidence 1.0
//! - one style above 60% of declarations: that style, confidence = its ratio
//! - otherwise mixed, confidence `1 - |short - long|` over the ratios

use std::fmt;

use log::debug;
use trellis_parser::{Syntax, grammar::grammar};

/// Share of declarations above which one syntax dominates.
const DOMINANCE: f64 = 0.6;

/// The detected style of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedSyntax {
    Shortform,
    Longform,
    /// Both syntaxes, neither dominant.
    Mixed,
}

impl From<Syntax> for DetectedSyntax {
    fn from(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Shortform => DetectedSyntax::Shortform,
            Syntax::Longform => DetectedSyntax::Longform,
        }
    }
}

impl fmt::Display for DetectedSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedSyntax::Shortform => write!(f, "shortform"),
            DetectedSyntax::Longform => write!(f, "longform"),
            DetectedSyntax::Mixed => write!(f, "mixed"),
        }
    }
}

/// Result of [`detect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    syntax: DetectedSyntax,
    confidence: f64,
    shortform: usize,
    longform: usize,
}

impl Detection {
    pub fn syntax(&self) -> DetectedSyntax {
        self.syntax
    }

    /// Confidence in `0.0..=1.0`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Number of shortform declarations seen.
    pub fn shortform_declarations(&self) -> usize {
        self.shortform
    }

    /// Number of longform declarations seen.
    pub fn longform_declarations(&self) -> usize {
        self.longform
    }

    /// The syntax the document is mostly written in.
    ///
    /// A mixed document counts as the syntax with more declarations, and as
    /// shortform on a tie.
    pub fn dominant(&self) -> Syntax {
        match self.syntax {
            DetectedSyntax::Shortform => Syntax::Shortform,
            DetectedSyntax::Longform => Syntax::Longform,
            DetectedSyntax::Mixed if self.longform > self.shortform => Syntax::Longform,
            DetectedSyntax::Mixed => Syntax::Shortform,
        }
    }
}

/// Detect the dominant syntax of `source`.
pub fn detect(source: &str) -> Detection {
    let grammar = grammar();
    let (mut shortform, mut longform) = (0, 0);

    for line in source.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        if grammar.is_longform_declaration(line) {
            longform += 1;
        } else if !line.starts_with(char::is_whitespace) && grammar.is_shortform_declaration(line) {
            shortform += 1;
        }
    }

    let detection = classify(shortform, longform);
    debug!(
        shortform = shortform,
        longform = longform,
        syntax:% = detection.syntax,
        confidence = detection.confidence;
        "Detected syntax"
    );
    detection
}

fn classify(shortform: usize, longform: usize) -> Detection {
    let detection = |syntax, confidence| Detection {
        syntax,
        confidence,
        shortform,
        longform,
    };

    let total = shortform + longform;
    if total == 0 {
        return detection(DetectedSyntax::Shortform, 0.5);
    }
    if longform == 0 {
        return detection(DetectedSyntax::Shortform, 1.0);
    }
    if shortform == 0 {
        return detection(DetectedSyntax::Longform, 1.0);
    }

    let short_ratio = shortform as f64 / total as f64;
    let long_ratio = longform as f64 / total as f64;
    if short_ratio > DOMINANCE {
        detection(DetectedSyntax::Shortform, short_ratio)
    } else if long_ratio > DOMINANCE {
        detection(DetectedSyntax::Longform, long_ratio)
    } else {
        detection(DetectedSyntax::Mixed, 1.0 - (short_ratio - long_ratio).abs())
    }
}

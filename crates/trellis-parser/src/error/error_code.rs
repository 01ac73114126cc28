//! Error codes for the Trellis diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Scanner diagnostics
//! - `E1xx` - Resolution and linking diagnostics
//! - `E2xx` - Validation diagnostics

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Scanner (E0xx)
    // =========================================================================
    /// Unrecognized line.
    ///
    /// The line is neither a declaration, a continuation, an import, nor a
    /// comment. It is skipped.
    E001,

    /// Unterminated longform block.
    ///
    /// A `{` was opened but the document ended before the matching `}`.
    E002,

    /// Malformed longform property or value.
    ///
    /// The property is skipped up to the next separator.
    E003,

    /// Unknown run parameter kind.
    ///
    /// Valid kinds are `env`, `iam`, `runtime` and `config`.
    E004,

    // =========================================================================
    // Resolution and linking (E1xx)
    // =========================================================================
    /// Import could not be read.
    E100,

    /// Circular import.
    ///
    /// A document imports itself, directly or through other documents.
    E101,

    /// Extra DTO in a dependency list.
    ///
    /// A function takes at most one input DTO; further DTOs in its mixed
    /// dependency list are dropped.
    E110,

    // =========================================================================
    // Validation (E2xx)
    // =========================================================================
    /// Orphan entity.
    ///
    /// Nothing references the entity.
    E200,

    /// Unresolved reference.
    E201,

    /// Circular dependency.
    ///
    /// Files import each other, or functions call each other, in a cycle.
    E202,

    /// No program.
    E203,

    /// More than one program.
    E204,

    /// Program entry is not a file or class file.
    E205,

    /// Two entities share a source path.
    E206,

    /// Class or function is never exported.
    E207,

    /// Name exported by more than one file.
    E208,

    /// Invalid method call.
    ///
    /// `Owner.method` names an owner that is not a class, or a method the
    /// owner does not list; or a class is called directly.
    E209,

    /// Exported name does not exist.
    E210,

    /// DTO contract violation.
    ///
    /// Function input/output and constants schema must be DTOs, and DTO
    /// fields cannot have function types.
    E211,

    /// Capability violation.
    ///
    /// A property or export that the entity's kind does not support.
    E212,

    /// Class file exports itself explicitly.
    E213,

    /// Class and file share a name.
    E214,

    /// Duplicate entity.
    E215,

    /// Reference resolves to an entity of the wrong kind.
    E216,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E110 => "E110",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E208 => "E208",
            ErrorCode::E209 => "E209",
            ErrorCode::E210 => "E210",
            ErrorCode::E211 => "E211",
            ErrorCode::E212 => "E212",
            ErrorCode::E213 => "E213",
            ErrorCode::E214 => "E214",
            ErrorCode::E215 => "E215",
            ErrorCode::E216 => "E216",
        }
    }

    /// Returns a short description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unrecognized line",
            ErrorCode::E002 => "unterminated block",
            ErrorCode::E003 => "malformed property",
            ErrorCode::E004 => "unknown run parameter kind",
            ErrorCode::E100 => "unreadable import",
            ErrorCode::E101 => "circular import",
            ErrorCode::E110 => "extra DTO dependency",
            ErrorCode::E200 => "orphan entity",
            ErrorCode::E201 => "unresolved reference",
            ErrorCode::E202 => "circular dependency",
            ErrorCode::E203 => "missing program",
            ErrorCode::E204 => "multiple programs",
            ErrorCode::E205 => "invalid program entry",
            ErrorCode::E206 => "duplicate path",
            ErrorCode::E207 => "unexported entity",
            ErrorCode::E208 => "duplicate export",
            ErrorCode::E209 => "invalid method call",
            ErrorCode::E210 => "undefined export",
            ErrorCode::E211 => "DTO contract violation",
            ErrorCode::E212 => "capability violation",
            ErrorCode::E213 => "redundant self-export",
            ErrorCode::E214 => "class and file name conflict",
            ErrorCode::E215 => "duplicate entity",
            ErrorCode::E216 => "reference kind mismatch",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Source location types.
//!
//! Two complementary location types are used throughout Trellis:
//!
//! - [`Span`]: a half-open byte range into one source document, used for
//!   labelled diagnostic rendering.
//! - [`Position`]: a 1-based line/column pair, the location reported to users
//!   and to editor integrations.

use std::{fmt, ops::Range};

use serde::Serialize;

/// A half-open byte range `start..end` into a source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Return the span shifted right by `offset` bytes.
    pub fn shifted(&self, offset: usize) -> Span {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

/// A 1-based line and column in a source document.
///
/// Columns count characters, not bytes. Editor protocols that use 0-based
/// coordinates should go through [`Position::to_zero_based`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Create a position. Zero values are clamped to 1.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
        }
    }

    /// The start of a document.
    pub fn start() -> Self {
        Self::new(1, 1)
    }

    /// The 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The 1-based column number.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Convert to a 0-based `(line, column)` pair.
    pub fn to_zero_based(&self) -> (u32, u32) {
        (self.line - 1, self.column - 1)
    }

    /// Compute the position of `offset` in `source`.
    ///
    /// Offsets past the end of the source map to the position just after the
    /// last character.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..floor_char_boundary(source, offset)];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() as u32 + 1;
        Self::new(line, column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// A generic wrapper that tracks the source position of a value.
///
/// `Spanned<T>` lets scanner and validator code keep precise locations next
/// to the values they describe without threading them separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spanned<T> {
    value: T,
    span: Span,
    position: Position,
}

impl<T> Spanned<T> {
    /// Create a new spanned value.
    pub fn new(value: T, span: Span, position: Position) -> Self {
        Self {
            value,
            span,
            position,
        }
    }

    /// Get the byte span of the value.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the line/column position of the value.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get a reference to the underlying value
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and return just the inner value
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Convert from one spanned type to another, keeping the location.
    pub fn map<F, U>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
            position: self.position,
        }
    }
}

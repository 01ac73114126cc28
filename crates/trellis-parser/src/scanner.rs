//! The declaration scanner.
//!
//! Scanning is line-oriented and never fails: every line is an import
//! statement, the head of a longform block, a shortform declaration, an
//! indented shortform continuation, a comment, or blank. Anything else is
//! skipped with an `E001` warning.
//!
//! Both syntaxes may be mixed freely within one document.

mod longform;
mod shortform;

use log::{debug, trace};
use trellis_core::{Entity, EntityGraph, Position, Span};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    grammar::{Statement, grammar},
    value,
};

/// An `import "path" [as alias]` statement awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub path: String,
    pub alias: Option<String>,
    pub position: Position,
    pub span: Span,
}

/// The result of scanning one document.
#[derive(Debug, Clone, Default)]
pub struct ScannedDocument {
    /// Every entity declared in the document, duplicates included.
    pub graph: EntityGraph,
    /// Import statements in document order.
    pub imports: Vec<ImportStatement>,
    /// Structural diagnostics, ordered by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScannedDocument {
    /// Whether any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }
}

/// One source line without its line terminator.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// 1-based line number.
    number: u32,
    /// Byte offset of the first character.
    start: usize,
    text: &'a str,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }

    fn span(&self) -> Span {
        Span::new(self.start..self.end())
    }

    fn is_indented(&self) -> bool {
        self.text.starts_with(char::is_whitespace)
    }

    /// Position of the first non-blank character.
    fn first_position(&self) -> Position {
        let indent = self
            .text
            .chars()
            .take_while(|c| c.is_whitespace())
            .count() as u32;
        Position::new(self.number, indent + 1)
    }
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, raw) in source.split_inclusive('\n').enumerate() {
        let text = raw.trim_end_matches(['\n', '\r']);
        lines.push(Line {
            number: idx as u32 + 1,
            start,
            text,
        });
        start += raw.len();
    }
    lines
}

struct Scanner<'s> {
    source: &'s str,
    graph: EntityGraph,
    imports: Vec<ImportStatement>,
    diagnostics: DiagnosticCollector,
    active: Option<shortform::Pending>,
}

impl<'s> Scanner<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            graph: EntityGraph::new(),
            imports: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            active: None,
        }
    }

    /// Scan the line at `index`, returning the index of the next unscanned line.
    fn line(&mut self, lines: &[Line<'s>], index: usize) -> usize {
        let line = lines[index];
        let trimmed = line.text.trim();
        if trimmed.is_empty() {
            return index + 1;
        }

        if let Some(caps) = grammar().statement(Statement::Import, line.text) {
            self.finish_active();
            self.imports.push(ImportStatement {
                path: value::unquote(&caps["path"]),
                alias: caps.name("alias").map(|alias| alias.as_str().to_string()),
                position: line.first_position(),
                span: line.span(),
            });
            return index + 1;
        }

        if let Some(caps) = grammar().statement(Statement::Block, line.text) {
            self.finish_active();
            let head = longform::BlockHead {
                keyword: caps["keyword"].to_string(),
                name: caps["name"].to_string(),
                keyword_start: line.start + caps.name("keyword").map_or(0, |m| m.start()),
                open_brace: line.start + caps.get(0).map_or(0, |m| m.end()) - 1,
            };
            return longform::scan_block(self, lines, head);
        }

        if line.is_indented() {
            match &mut self.active {
                Some(pending) => {
                    shortform::continuation(pending, &line, &mut self.diagnostics);
                }
                None if trimmed.starts_with('#') => {}
                None => {
                    debug!(line = line.number; "Continuation line without an active entity ignored");
                }
            }
            return index + 1;
        }

        if trimmed.starts_with('#') {
            return index + 1;
        }

        if let Some((kind, caps)) = grammar().declaration(line.text) {
            self.finish_active();
            let entity = shortform::declaration(kind, &caps, &line, &mut self.diagnostics);
            self.active = Some(shortform::Pending::new(entity, &line));
            return index + 1;
        }

        self.finish_active();
        self.diagnostics.emit(
            Diagnostic::warning(format!("unrecognized line `{trimmed}`"))
                .with_code(ErrorCode::E001)
                .with_position(line.first_position())
                .with_label(line.span(), ErrorCode::E001.description())
                .with_help("declarations start at column 1; continuations are indented"),
        );
        index + 1
    }

    fn finish_active(&mut self) {
        if let Some(pending) = self.active.take() {
            let entity = pending.finish(self.source);
            self.insert(entity);
        }
    }

    fn insert(&mut self, entity: Entity) {
        trace!(name = entity.name(), kind:% = entity.kind(); "Scanned entity");
        if let Err(err) = self.graph.insert(entity) {
            debug!(name = err.name.as_str(); "Duplicate entity kept for validation");
        }
    }

    fn finish(mut self) -> ScannedDocument {
        self.finish_active();
        ScannedDocument {
            graph: self.graph,
            imports: self.imports,
            diagnostics: self.diagnostics.finish(),
        }
    }
}

/// Scan a document into entity records and pending import statements.
///
/// The returned graph is not linked; see [`crate::linker::link`].
pub fn scan(source: &str) -> ScannedDocument {
    debug!(bytes = source.len(); "Scanning document");
    let lines = split_lines(source);
    let mut scanner = Scanner::new(source);

    let mut index = 0;
    while index < lines.len() {
        index = scanner.line(&lines, index);
    }

    let document = scanner.finish();
    debug!(
        entities = document.graph.len(),
        imports = document.imports.len(),
        diagnostics = document.diagnostics.len();
        "Scanned document"
    );
    document
}

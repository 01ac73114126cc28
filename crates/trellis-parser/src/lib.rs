//! # Trellis Parser
//!
//! Text to entity graph for the Trellis architecture language. Documents may
//! mix the terse operator-based shortform syntax and the keyword/brace
//! longform syntax freely.
//!
//! The pipeline:
//!
//! 1. **Scan** ([`scanner`]) - lines to entity records and pending imports
//! 2. **Link** ([`linker`]) - distribute mixed dependency lists and derive
//!    back-references
//! 3. **Resolve** ([`resolver`], optional) - merge imported documents, then
//!    link again
//!
//! None of the stages fail: structural problems are reported as
//! [`Diagnostic`](error::Diagnostic)s next to the best-effort graph.
//!
//! ## Usage
//!
//! ```
//! # use trellis_parser::parse;
//! let document = parse("Shop -> Main\nMain @ src/main.ts\n");
//!
//! assert!(document.diagnostics.is_empty());
//! assert_eq!(document.graph.len(), 2);
//! ```

pub mod error;
pub mod grammar;
pub mod linker;
pub mod resolver;
pub mod scanner;
pub mod value;

use std::path::Path;

use log::debug;

pub use grammar::Syntax;
pub use resolver::{DocumentSource, FileSystemSource, MemorySource, Resolution, Resolver};
pub use scanner::{ImportStatement, ScannedDocument, scan};

/// A scanned and linked document.
pub type ParsedDocument = ScannedDocument;

/// Scan and link one document without resolving its imports.
///
/// The import statements are returned unresolved in
/// [`ParsedDocument::imports`].
pub fn parse(source: &str) -> ParsedDocument {
    let mut document = scan(source);
    let link_diagnostics = linker::link(&mut document.graph);
    if !link_diagnostics.is_empty() {
        debug!(count = link_diagnostics.len(); "Linker reported diagnostics");
        document.diagnostics.extend(link_diagnostics);
        document.diagnostics.sort_by(|a, b| a.cmp_location(b));
    }
    document
}

/// Scan a document, resolve its imports through `source` and link the merged
/// graph.
///
/// `base` is the location of the document itself; imports are located
/// relative to it.
pub fn parse_with_imports(
    text: &str,
    base: Option<&Path>,
    source: &dyn DocumentSource,
) -> Resolution {
    Resolver::new(source).resolve(scan(text), base)
}

//! Deterministic rendering of an entity graph into either surface syntax.
//!
//! Renderers work from entity records alone and never look at the original
//! source text. A document renders as its import statements followed by every
//! entity, ordered by kind precedence and then by name, separated by blank
//! lines.

pub mod longform;
pub mod shortform;

use log::{debug, trace};
use trellis_core::{Entity, EntityGraph};
use trellis_parser::{ImportStatement, Syntax, value::quote};

use crate::convert::ConvertError;

pub use longform::LongformRenderer;
pub use shortform::ShortformRenderer;

/// Renders entities in one surface syntax.
pub trait Renderer {
    /// The syntax this renderer produces.
    fn syntax(&self) -> Syntax;

    /// Append one entity, including its trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the entity cannot be expressed in this
    /// syntax.
    fn render_entity(&self, entity: &Entity, out: &mut String) -> Result<(), ConvertError>;

    /// Append one import statement, including its trailing newline.
    fn render_import(&self, import: &ImportStatement, out: &mut String) {
        out.push_str("import ");
        out.push_str(&quote(&import.path));
        if let Some(alias) = &import.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
        out.push('\n');
    }
}

/// Entities of `graph` in rendering order.
pub fn ordered(graph: &EntityGraph) -> Vec<&Entity> {
    let mut entities: Vec<&Entity> = graph.iter().collect();
    entities.sort_by(|a, b| {
        a.kind()
            .precedence()
            .cmp(&b.kind().precedence())
            .then_with(|| a.name().cmp(b.name()))
    });
    entities
}

/// Render imports and entities with `renderer`.
///
/// Duplicate declarations are not part of the graph's name index and are
/// not rendered.
///
/// # Errors
///
/// Returns the first [`ConvertError`] raised for an entity, in rendering
/// order.
pub fn render(
    renderer: &dyn Renderer,
    imports: &[ImportStatement],
    graph: &EntityGraph,
) -> Result<String, ConvertError> {
    debug!(
        syntax:% = renderer.syntax(),
        entities = graph.len(),
        imports = imports.len();
        "Rendering document"
    );
    if !graph.duplicates().is_empty() {
        debug!(duplicates = graph.duplicates().len(); "Duplicate declarations are not rendered");
    }

    let mut out = String::new();
    for import in imports {
        renderer.render_import(import, &mut out);
    }

    for entity in ordered(graph) {
        if !out.is_empty() {
            out.push('\n');
        }
        trace!(name = entity.name(), kind:% = entity.kind(); "Rendering entity");
        renderer.render_entity(entity, &mut out)?;
    }
    Ok(out)
}

/// Whether `name` is a plain identifier `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `text` survives as a bare list item or word in either syntax.
pub(crate) fn is_bare(text: &str) -> bool {
    !text.is_empty()
        && !text.chars().any(|c| {
            c.is_whitespace() || matches!(c, ',' | '[' | ']' | '{' | '}' | '"' | '#')
        })
}

/// A list item, quoted when it is not bare.
pub(crate) fn item(text: &str) -> String {
    if is_bare(text) {
        text.to_string()
    } else {
        quote(text)
    }
}

/// `a, b, c` with every item bare or quoted.
pub(crate) fn items(list: &[String]) -> String {
    list.iter().map(|text| item(text)).collect::<Vec<_>>().join(", ")
}

/// Reject names that no declaration can carry, e.g. alias-prefixed merged
/// names.
pub(crate) fn check_name(entity: &Entity, syntax: Syntax) -> Result<(), ConvertError> {
    if is_identifier(entity.name()) {
        Ok(())
    } else {
        Err(ConvertError::InvalidName {
            name: entity.name().to_string(),
            kind: entity.kind(),
            syntax,
        })
    }
}

#[cfg(test)]
mod tests {
    use trellis_parser::parse;

    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("Main"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier("ui.Header"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_items_quote_when_needed() {
        let list = vec!["Store.load".to_string(), "has space".to_string(), "a,b".to_string()];
        assert_eq!(items(&list), r#"Store.load, "has space", "a,b""#);
    }

    #[test]
    fn test_order_by_precedence_then_name() {
        let graph = parse(
            "zeta :: () => void\nReact ^ \"UI\"\nalpha :: () => void\nMain @ main.ts\nShop -> Main\n",
        )
        .graph;
        let names: Vec<_> = ordered(&graph).iter().map(|e| e.name()).collect();
        assert_eq!(names, ["Shop", "Main", "alpha", "zeta", "React"]);
    }
}

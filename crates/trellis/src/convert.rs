//! Conversion between the two surface syntaxes.

use log::info;
use thiserror::Error;
use trellis_core::EntityKind;
use trellis_parser::{ParsedDocument, Syntax, parse};

use crate::{
    config::ConvertConfig,
    detect::detect,
    render::{LongformRenderer, Renderer, ShortformRenderer, render},
};

/// An entity that cannot be written in the requested syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The name is not a plain identifier, e.g. an alias-prefixed name merged
    /// from an import.
    #[error("{kind} `{name}` cannot be declared in {syntax}: not a plain identifier")]
    InvalidName {
        name: String,
        kind: EntityKind,
        syntax: Syntax,
    },

    #[error("`{name}` cannot be written in {syntax}: {reason}")]
    Unrepresentable {
        name: String,
        syntax: Syntax,
        reason: String,
    },
}

impl ConvertError {
    /// The entity that failed to render.
    pub fn name(&self) -> &str {
        match self {
            ConvertError::InvalidName { name, .. } | ConvertError::Unrepresentable { name, .. } => {
                name
            }
        }
    }
}

/// The renderer for `syntax`.
pub fn renderer(syntax: Syntax, config: &ConvertConfig) -> Box<dyn Renderer> {
    match syntax {
        Syntax::Shortform => Box::new(ShortformRenderer::new(config.indent())),
        Syntax::Longform => Box::new(LongformRenderer::new(config.indent())),
    }
}

/// Render a parsed document in `syntax`.
///
/// # Errors
///
/// Returns [`ConvertError`] naming the first entity that has no form in
/// `syntax`.
pub fn convert(
    document: &ParsedDocument,
    syntax: Syntax,
    config: &ConvertConfig,
) -> Result<String, ConvertError> {
    info!(syntax:% = syntax; "Converting document");
    render(renderer(syntax, config).as_ref(), &document.imports, &document.graph)
}

/// Detect the dominant syntax of `source` and render it in the other one.
///
/// Returns the target syntax with the rendered text.
///
/// # Errors
///
/// Returns [`ConvertError`] naming the first entity that has no form in the
/// target syntax.
pub fn toggle(source: &str, config: &ConvertConfig) -> Result<(Syntax, String), ConvertError> {
    let target = detect(source).dominant().opposite();
    let document = parse(source);
    convert(&document, target, config).map(|text| (target, text))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use trellis_parser::{MemorySource, parse_with_imports};

    use super::*;

    #[test]
    fn test_toggle_switches_syntax() {
        let config = ConvertConfig::default();
        let (syntax, longform) = toggle("Shop -> Main\nMain @ src/main.ts\n", &config).unwrap();
        assert_eq!(syntax, Syntax::Longform);
        assert_eq!(
            longform,
            "program Shop {\n  entry: Main\n}\n\nfile Main {\n  path: src/main.ts\n}\n"
        );

        let (syntax, shortform) = toggle(&longform, &config).unwrap();
        assert_eq!(syntax, Syntax::Shortform);
        assert_eq!(shortform, "Shop -> Main\n\nMain @ src/main.ts\n");
    }

    #[test]
    fn test_imports_come_first() {
        let document = parse("import \"ui.trellis\" as ui\nMain @ src/main.ts\n");
        let out = convert(&document, Syntax::Shortform, &ConvertConfig::new(4)).unwrap();
        assert_eq!(out, "import \"ui.trellis\" as ui\n\nMain @ src/main.ts\n");
    }

    #[test]
    fn test_merged_names_are_rejected() {
        let documents = MemorySource::new().with("ui.trellis", "Header & \"h\"\n");
        let resolution = parse_with_imports(
            "import \"ui.trellis\" as ui\nMain @ src/main.ts\n",
            Some(Path::new("main.trellis")),
            &documents,
        );
        let document = ParsedDocument {
            graph: resolution.graph,
            imports: Vec::new(),
            diagnostics: Vec::new(),
        };

        let err = convert(&document, Syntax::Longform, &ConvertConfig::default()).unwrap_err();
        assert_eq!(err.name(), "ui.Header");
        assert!(matches!(err, ConvertError::InvalidName { kind: EntityKind::UiComponent, .. }));
    }
}

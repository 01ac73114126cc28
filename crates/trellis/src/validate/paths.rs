//! Source paths are declared once.

use std::collections::HashMap;

use trellis_core::Entity;
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, at};

pub(super) struct UniquePaths;

impl Check for UniquePaths {
    fn name(&self) -> &'static str {
        "paths"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let mut seen: HashMap<&str, &Entity> = HashMap::new();

        for entity in cx.graph().iter() {
            let Some(path) = entity.data().path().filter(|path| !path.is_empty()) else {
                continue;
            };
            let Some(first) = seen.get(path).copied() else {
                seen.insert(path, entity);
                continue;
            };

            let mut diagnostic = at(
                Diagnostic::error(format!(
                    "path `{path}` of `{}` is already used by `{}`",
                    entity.name(),
                    first.name()
                ))
                .with_code(ErrorCode::E206)
                .with_help("each source path belongs to one file"),
                entity,
                "duplicate path",
            );
            if first.origin() == entity.origin() {
                diagnostic = diagnostic.with_secondary_label(first.span(), "first used here");
            }
            diagnostics.emit(diagnostic);
        }
    }
}

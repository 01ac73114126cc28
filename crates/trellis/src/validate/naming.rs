//! Names declared more than once.

use trellis_core::EntityKind;
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, article, at};

pub(super) struct NamingConflicts;

impl Check for NamingConflicts {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();

        for duplicate in graph.duplicates() {
            let entity = duplicate.entity();
            let original = graph.entity(duplicate.original());
            let name = entity.name();

            let kinds = [entity.kind(), original.kind()];
            let class_and_file =
                kinds.contains(&EntityKind::Class) && kinds.contains(&EntityKind::File);

            let mut diagnostic = if class_and_file {
                let path = [entity, original]
                    .iter()
                    .find_map(|e| e.data().path())
                    .unwrap_or("path");
                at(
                    Diagnostic::error(format!(
                        "`{name}` is declared as both a class and a file"
                    ))
                    .with_code(ErrorCode::E214)
                    .with_help(format!("fuse them into a class file: `{name} #: {path}`")),
                    entity,
                    "declared again here",
                )
            } else {
                at(
                    Diagnostic::error(format!(
                        "`{name}` is already declared as {} {}",
                        article(original.kind()),
                        original.kind()
                    ))
                    .with_code(ErrorCode::E215)
                    .with_help("rename one of them, or import it under an alias"),
                    entity,
                    "declared again here",
                )
            };
            if entity.origin() == original.origin() {
                diagnostic = diagnostic.with_secondary_label(original.span(), "first declared here");
            }
            diagnostics.emit(diagnostic);
        }
    }
}

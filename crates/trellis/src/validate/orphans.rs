//! Entities nothing points at.

use std::collections::HashSet;

use trellis_core::{EntityGraph, EntityKind, Relation, graph::split_method_reference};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, at};

pub(super) struct Orphans;

/// Names reached by at least one forward reference from another entity.
fn referenced(graph: &EntityGraph) -> HashSet<&str> {
    let mut referenced = HashSet::new();
    for entity in graph.iter() {
        for (relation, target) in entity.data().references() {
            if relation == Relation::Dependencies {
                continue;
            }
            let mut mark = |name: &str| {
                if let Some(found) = graph.get(name).filter(|found| found.name() != entity.name()) {
                    referenced.insert(found.name());
                }
            };

            if let Some(prefix) = target.strip_suffix(".*") {
                let prefix = format!("{prefix}.");
                for name in graph.names().filter(|name| name.starts_with(&prefix)) {
                    mark(name);
                }
                continue;
            }
            if graph.contains(target) {
                mark(target);
                continue;
            }
            if let Some((owner, method)) = split_method_reference(target) {
                mark(owner);
                let listed = graph
                    .get(owner)
                    .is_some_and(|owner| owner.data().methods().iter().any(|m| m == method));
                if listed {
                    mark(method);
                }
            }
        }
    }
    referenced
}

impl Check for Orphans {
    fn name(&self) -> &'static str {
        "orphans"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();
        let referenced = referenced(graph);

        for entity in graph.iter() {
            if entity.kind() == EntityKind::Program || referenced.contains(entity.name()) {
                continue;
            }
            diagnostics.emit(at(
                Diagnostic::error(format!(
                    "{} `{}` is never referenced",
                    entity.kind(),
                    entity.name()
                ))
                .with_code(ErrorCode::E200)
                .with_help("import, export, call or otherwise use it, or remove it"),
                entity,
                "orphan",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_parser::{MemorySource, parse_with_imports};

    use super::*;
    use crate::validate::test_support::{run_check, run_check_on};

    #[test]
    fn test_unreferenced_entities_are_orphans() {
        let diagnostics = run_check(
            Orphans,
            "Shop -> Main\nMain @ src/main.ts\n  -> run\nrun :: () => void\nlonely :: () => void\nLogo ~ \"Logo\"\n",
        );

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(
            messages,
            ["function `lonely` is never referenced", "asset `Logo` is never referenced"]
        );
    }

    #[test]
    fn test_self_reference_does_not_count() {
        let diagnostics = run_check(Orphans, "Shop -> Main\nMain @ src/main.ts\nloop :: () => void\n  => loop\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message().contains("`loop`"));
    }

    #[test]
    fn test_method_and_wildcard_references() {
        let diagnostics = run_check(
            Orphans,
            "Shop -> Main\nMain @ src/main.ts\n  -> run, Store\nrun :: () => void\n  => Store.load\nStore <: _\n  > load\nload :: () => void\n",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let documents = MemorySource::new().with("ui.trellis", "Header & \"h\"\n");
        let resolution = parse_with_imports(
            "import \"ui.trellis\" as ui\nShop -> Main\nMain @ src/main.ts\n  <- ui.*\n",
            Some(std::path::Path::new("main.trellis")),
            &documents,
        );
        assert!(run_check_on(Orphans, &resolution.graph).is_empty());
    }

    #[test]
    fn test_unused_imported_entity_is_orphan() {
        let documents = MemorySource::new().with(
            "ui.trellis",
            "Header & \"h\"\norphan ~ \"unused asset\"\n",
        );
        let resolution = parse_with_imports(
            "import \"ui.trellis\" as ui\nShop -> Main\nMain @ src/main.ts\n  <- ui.Header\n",
            Some(std::path::Path::new("main.trellis")),
            &documents,
        );

        let diagnostics = run_check_on(Orphans, &resolution.graph);
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(messages, ["asset `ui.orphan` is never referenced"]);
        assert!(diagnostics[0].document().is_some());
    }
}

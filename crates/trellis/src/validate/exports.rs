//! Export lists: coverage, uniqueness and resolution.

use std::collections::{HashMap, HashSet};

use trellis_core::{Entity, EntityGraph, EntityKind};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, at, with_help};

/// Every class, and every function that is not a method, is exported by
/// some file.
pub(super) struct ExportCoverage;

/// A name is exported by at most one file.
pub(super) struct DuplicateExports;

/// Export lists name real entities.
pub(super) struct UndefinedExports;

fn exporters(graph: &EntityGraph) -> impl Iterator<Item = &Entity> {
    graph.iter().filter(|entity| entity.kind().is_file_like())
}

fn methods(graph: &EntityGraph) -> HashSet<&str> {
    graph
        .iter()
        .filter(|entity| entity.kind().is_class_like())
        .flat_map(|entity| entity.data().methods())
        .map(String::as_str)
        .collect()
}

impl Check for ExportCoverage {
    fn name(&self) -> &'static str {
        "export-coverage"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();
        let exported: HashSet<&str> = exporters(graph)
            .flat_map(|entity| entity.data().exports())
            .map(String::as_str)
            .collect();
        let methods = methods(graph);

        for entity in graph.iter() {
            let needs_export = match entity.kind() {
                EntityKind::Class => true,
                EntityKind::Function => !methods.contains(entity.name()),
                _ => false,
            };
            if !needs_export || exported.contains(entity.name()) {
                continue;
            }
            diagnostics.emit(at(
                Diagnostic::error(format!(
                    "{} `{}` is not exported by any file",
                    entity.kind(),
                    entity.name()
                ))
                .with_code(ErrorCode::E207)
                .with_help(format!(
                    "add `{}` to the exports of the file that defines it",
                    entity.name()
                )),
                entity,
                "not exported",
            ));
        }
    }
}

impl Check for DuplicateExports {
    fn name(&self) -> &'static str {
        "duplicate-exports"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let mut first_exporter: HashMap<&str, &Entity> = HashMap::new();

        for entity in exporters(cx.graph()) {
            let mut listed = HashSet::new();
            for name in entity.data().exports() {
                if !listed.insert(name.as_str()) {
                    continue;
                }
                let Some(first) = first_exporter.get(name.as_str()).copied() else {
                    first_exporter.insert(name, entity);
                    continue;
                };
                let mut diagnostic = at(
                    Diagnostic::error(format!(
                        "`{name}` is exported by both `{}` and `{}`",
                        first.name(),
                        entity.name()
                    ))
                    .with_code(ErrorCode::E208)
                    .with_help("export each name from the one file that defines it"),
                    entity,
                    "exported again here",
                );
                if first.origin() == entity.origin() {
                    diagnostic = diagnostic.with_secondary_label(first.span(), "first exported here");
                }
                diagnostics.emit(diagnostic);
            }
        }
    }
}

impl Check for UndefinedExports {
    fn name(&self) -> &'static str {
        "undefined-exports"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();
        let owners = graph
            .iter()
            .filter(|entity| entity.kind().is_file_like() || entity.kind() == EntityKind::Program);

        for entity in owners {
            for name in entity.data().exports() {
                if graph.contains(name) {
                    continue;
                }
                let diagnostic = at(
                    Diagnostic::error(format!(
                        "`{}` exports `{name}`, which is not defined",
                        entity.name()
                    ))
                    .with_code(ErrorCode::E210),
                    entity,
                    "exported here",
                );
                diagnostics.emit(with_help(diagnostic, cx.suggest_name(name)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::test_support::{codes, run_check};

    #[test]
    fn test_unexported_class_and_function() {
        let diagnostics = run_check(
            ExportCoverage,
            "Main @ src/main.ts\n  -> run\nrun :: () => void\nhelper :: () => void\nStore <: _\n  > load\nload :: () => void\n",
        );

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(
            messages,
            [
                "function `helper` is not exported by any file",
                "class `Store` is not exported by any file",
            ]
        );
    }

    #[test]
    fn test_program_exports_do_not_cover() {
        let diagnostics = run_check(
            ExportCoverage,
            "Shop -> Main\n  -> run\nMain @ src/main.ts\nrun :: () => void\n",
        );
        assert_eq!(codes(&diagnostics), [ErrorCode::E207]);
    }

    #[test]
    fn test_duplicate_exports() {
        let diagnostics = run_check(
            DuplicateExports,
            "A @ a.ts\n  -> run, run\nB @ b.ts\n  -> run\nC @ c.ts\n  -> run\nrun :: () => void\n",
        );

        assert_eq!(codes(&diagnostics), [ErrorCode::E208, ErrorCode::E208]);
        assert_eq!(diagnostics[0].message(), "`run` is exported by both `A` and `B`");
        assert_eq!(diagnostics[1].position().line(), 5);
    }

    #[test]
    fn test_undefined_exports() {
        let diagnostics = run_check(
            UndefinedExports,
            "Shop -> Main\n  -> Main, checkuot\nMain @ src/main.ts\n  -> checkout, ghost\ncheckout :: () => void\n",
        );

        assert_eq!(codes(&diagnostics), [ErrorCode::E210, ErrorCode::E210]);
        assert_eq!(diagnostics[0].help(), Some("did you mean `checkout`?"));
        assert_eq!(diagnostics[1].message(), "`Main` exports `ghost`, which is not defined");
    }
}

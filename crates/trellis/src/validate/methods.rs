//! Calls into classes go through a listed method.

use trellis_core::{EntityData, graph::split_method_reference};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, article, at, with_help};

pub(super) struct MethodCalls;

impl Check for MethodCalls {
    fn name(&self) -> &'static str {
        "methods"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();

        for entity in graph.iter() {
            let EntityData::Function(function) = entity.data() else {
                continue;
            };

            for call in &function.calls {
                if let Some(target) = graph.get(call) {
                    if target.kind().is_class_like() {
                        diagnostics.emit(at(
                            Diagnostic::error(format!(
                                "`{}` calls {} `{call}` directly",
                                entity.name(),
                                target.kind()
                            ))
                            .with_code(ErrorCode::E209)
                            .with_help(format!("call one of its methods, e.g. `{call}.method`")),
                            entity,
                            "call declared here",
                        ));
                    }
                    continue;
                }

                let Some((owner_name, method)) = split_method_reference(call) else {
                    continue;
                };
                let Some(owner) = graph.get(owner_name) else {
                    continue;
                };

                if !owner.kind().is_class_like() {
                    diagnostics.emit(at(
                        Diagnostic::error(format!(
                            "`{}` calls `{call}`, but `{owner_name}` is {} {} and has no methods",
                            entity.name(),
                            article(owner.kind()),
                            owner.kind()
                        ))
                        .with_code(ErrorCode::E209),
                        entity,
                        "call declared here",
                    ));
                    continue;
                }

                let methods = owner.data().methods();
                if methods.iter().any(|listed| listed == method) {
                    continue;
                }
                let diagnostic = at(
                    Diagnostic::error(format!(
                        "`{}` calls `{call}`, but `{method}` is not a method of `{owner_name}`",
                        entity.name()
                    ))
                    .with_code(ErrorCode::E209),
                    entity,
                    "call declared here",
                );
                let help = cx.suggestion(method, methods.iter().map(String::as_str));
                diagnostics.emit(with_help(diagnostic, help));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::test_support::{codes, run_check};

    const STORE: &str = "Store <: _\n  > load, save\nload :: () => void\nsave :: () => void\n";

    #[test]
    fn test_listed_method_call() {
        let source = format!("{STORE}run :: () => void\n  => Store.load, save\n");
        assert!(run_check(MethodCalls, &source).is_empty());
    }

    #[test]
    fn test_unlisted_method_call() {
        let source = format!("{STORE}run :: () => void\n  => Store.lod\n");
        let diagnostics = run_check(MethodCalls, &source);

        assert_eq!(codes(&diagnostics), [ErrorCode::E209]);
        assert_eq!(
            diagnostics[0].message(),
            "`run` calls `Store.lod`, but `lod` is not a method of `Store`"
        );
        assert_eq!(diagnostics[0].help(), Some("did you mean `load`?"));
    }

    #[test]
    fn test_direct_class_call() {
        let source = format!("{STORE}run :: () => void\n  => Store\n");
        let diagnostics = run_check(MethodCalls, &source);
        assert_eq!(codes(&diagnostics), [ErrorCode::E209]);
        assert_eq!(diagnostics[0].message(), "`run` calls class `Store` directly");
    }

    #[test]
    fn test_method_of_non_class() {
        let diagnostics = run_check(
            MethodCalls,
            "Main @ src/main.ts\nrun :: () => void\n  => Main.start\n",
        );
        assert_eq!(codes(&diagnostics), [ErrorCode::E209]);
        assert!(diagnostics[0].message().contains("is a file and has no methods"));
    }
}

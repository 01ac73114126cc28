//! Exactly one program, with an entry that is a file.

use trellis_core::{EntityData, EntityKind, Position};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, article, at, with_help};

pub(super) struct EntryPoint;

impl Check for EntryPoint {
    fn name(&self) -> &'static str {
        "entry"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();
        let mut programs = graph.of_kind(EntityKind::Program);

        let Some(first) = programs.next() else {
            diagnostics.emit(
                Diagnostic::error("no program is declared")
                    .with_code(ErrorCode::E203)
                    .with_position(Position::start())
                    .with_help("declare one, e.g. `Shop -> Main`"),
            );
            return;
        };

        for program in std::iter::once(first).chain(programs) {
            let EntityData::Program(data) = program.data() else {
                continue;
            };
            let entry = data.entry.as_str();
            match graph.get(entry) {
                _ if entry.is_empty() => diagnostics.emit(at(
                    Diagnostic::error(format!("program `{}` has no entry", program.name()))
                        .with_code(ErrorCode::E205),
                    program,
                    "declared here",
                )),
                Some(found) if found.kind().is_file_like() => {}
                Some(found) => {
                    let help = (found.kind() == EntityKind::Class).then(|| {
                        format!("declare `{entry}` as a class file, e.g. `{entry} #: path`")
                    });
                    diagnostics.emit(with_help(
                        at(
                            Diagnostic::error(format!(
                                "entry `{entry}` of program `{}` is {} {}, expected a file or class file",
                                program.name(),
                                article(found.kind()),
                                found.kind()
                            ))
                            .with_code(ErrorCode::E205),
                            program,
                            "entry declared here",
                        ),
                        help,
                    ));
                }
                None => {
                    let diagnostic = at(
                        Diagnostic::error(format!(
                            "entry `{entry}` of program `{}` is not defined",
                            program.name()
                        ))
                        .with_code(ErrorCode::E205),
                        program,
                        "entry declared here",
                    );
                    diagnostics.emit(with_help(diagnostic, cx.suggest_name(entry)));
                }
            }

            if program.name() != first.name() {
                diagnostics.emit(
                    at(
                        Diagnostic::error(format!(
                            "program `{}` is declared after program `{}`",
                            program.name(),
                            first.name()
                        ))
                        .with_code(ErrorCode::E204)
                        .with_help("a model describes exactly one program"),
                        program,
                        "second program",
                    )
                    .with_secondary_label(first.span(), "first program"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::test_support::{codes, run_check};

    #[test]
    fn test_single_program() {
        assert!(run_check(EntryPoint, "Shop -> Main\nMain @ src/main.ts\n").is_empty());
        assert!(run_check(EntryPoint, "Shop -> Api\nApi #: src/api.ts\n").is_empty());
    }

    #[test]
    fn test_missing_program() {
        let diagnostics = run_check(EntryPoint, "Main @ src/main.ts\n");
        assert_eq!(codes(&diagnostics), [ErrorCode::E203]);
        assert_eq!(diagnostics[0].position(), Position::start());
    }

    #[test]
    fn test_second_program() {
        let diagnostics = run_check(
            EntryPoint,
            "Shop -> Main\nAdmin -> Main\nMain @ src/main.ts\n",
        );
        assert_eq!(codes(&diagnostics), [ErrorCode::E204]);
        assert_eq!(diagnostics[0].position().line(), 2);
        assert!(diagnostics[0].message().contains("`Admin`"));
    }

    #[test]
    fn test_entry_must_be_a_file() {
        let diagnostics = run_check(EntryPoint, "Shop -> Store\nStore <: _\n");
        assert_eq!(codes(&diagnostics), [ErrorCode::E205]);
        assert_eq!(
            diagnostics[0].help(),
            Some("declare `Store` as a class file, e.g. `Store #: path`")
        );

        let diagnostics = run_check(EntryPoint, "Shop -> Maim\nMain @ src/main.ts\n");
        assert_eq!(codes(&diagnostics), [ErrorCode::E205]);
        assert_eq!(diagnostics[0].help(), Some("did you mean `Main`?"));
    }
}

//! Properties and exports an entity kind does not support.

use trellis_core::EntityKind;
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, article, at};

pub(super) struct Capabilities;

impl Check for Capabilities {
    fn name(&self) -> &'static str {
        "capabilities"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();

        for entity in graph.iter() {
            for property in entity.unsupported() {
                diagnostics.emit(
                    at(
                        Diagnostic::error(format!(
                            "{} `{}` does not support `{}`",
                            entity.kind(),
                            entity.name(),
                            property.name
                        ))
                        .with_code(ErrorCode::E212),
                        entity,
                        "declared here",
                    )
                    .with_position(property.position),
                );
            }

            for name in entity.data().exports() {
                let Some(exported) = graph.get(name) else {
                    continue;
                };
                if !exported.kind().is_exportable() {
                    diagnostics.emit(at(
                        Diagnostic::error(format!(
                            "`{}` exports `{name}`, but {} {} cannot be exported",
                            entity.name(),
                            article(exported.kind()),
                            exported.kind()
                        ))
                        .with_code(ErrorCode::E212)
                        .with_help("reference it through consumes, affects or imports instead"),
                        entity,
                        "exported here",
                    ));
                } else if entity.kind() == EntityKind::ClassFile && name == entity.name() {
                    diagnostics.emit(at(
                        Diagnostic::warning(format!("class file `{name}` exports itself"))
                        .with_code(ErrorCode::E213)
                        .with_help("a class file already provides its class; remove the export"),
                        entity,
                        "redundant export",
                    ));
                }
            }
        }
    }
}

//! DTO contracts: inputs, outputs and schemas name DTOs, and DTO fields hold
//! data, never functions.

use trellis_core::{Entity, EntityData, EntityKind};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, article, at, with_help};

pub(super) struct DtoContracts;

impl DtoContracts {
    fn expect_dto(
        cx: &Context<'_>,
        entity: &Entity,
        role: &str,
        target: &str,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let graph = cx.graph();
        let message = match graph.get(target) {
            Some(found) if found.kind() == EntityKind::Dto => return,
            Some(found) => format!(
                "{role} `{target}` of `{}` is {} {}, expected a DTO",
                entity.name(),
                article(found.kind()),
                found.kind()
            ),
            None => format!("{role} `{target}` of `{}` is not defined", entity.name()),
        };

        let candidates = graph.of_kind(EntityKind::Dto).map(|dto| dto.name());
        let diagnostic = at(
            Diagnostic::error(message).with_code(ErrorCode::E211),
            entity,
            "contract declared here",
        );
        diagnostics.emit(with_help(diagnostic, cx.suggestion(target, candidates)));
    }
}

impl Check for DtoContracts {
    fn name(&self) -> &'static str {
        "dto"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        for entity in cx.graph().iter() {
            match entity.data() {
                EntityData::Function(function) => {
                    if let Some(input) = &function.input {
                        Self::expect_dto(cx, entity, "input", input, diagnostics);
                    }
                    if let Some(output) = &function.output {
                        Self::expect_dto(cx, entity, "output", output, diagnostics);
                    }
                }
                EntityData::Constants(constants) => {
                    if let Some(schema) = &constants.schema {
                        Self::expect_dto(cx, entity, "schema", schema, diagnostics);
                    }
                }
                EntityData::Dto(dto) => {
                    for field in dto.fields.iter().filter(|field| field.has_function_type()) {
                        diagnostics.emit(at(
                            Diagnostic::error(format!(
                                "field `{}` of DTO `{}` has function type `{}`",
                                field.name,
                                entity.name(),
                                field.ty
                            ))
                            .with_code(ErrorCode::E211)
                            .with_help("DTOs carry data; model behaviour as a function"),
                            entity,
                            "DTO declared here",
                        ));
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::test_support::{codes, run_check};

    #[test]
    fn test_function_typed_field() {
        let diagnostics = run_check(
            DtoContracts,
            "CartDto % \"Cart\"\n  - total: number\n  - onChange: (total: number) => void\n",
        );

        assert_eq!(codes(&diagnostics), [ErrorCode::E211]);
        assert_eq!(
            diagnostics[0].message(),
            "field `onChange` of DTO `CartDto` has function type `(total: number) => void`"
        );
    }

    #[test]
    fn test_contracts_name_dtos() {
        let diagnostics = run_check(
            DtoContracts,
            "CartDto % \"Cart\"\nLogo ~ \"Logo\"\ncheckout :: (cart: Cart) => void\n  <- CartDto\n  -> Logo\nSettings ! app.json : CartDtoo\n",
        );

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(
            messages,
            [
                "output `Logo` of `checkout` is an asset, expected a DTO",
                "schema `CartDtoo` of `Settings` is not defined",
            ]
        );
        assert_eq!(diagnostics[1].help(), Some("did you mean `CartDto`?"));
    }
}

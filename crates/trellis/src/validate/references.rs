//! Unresolved references and references to the wrong kind of entity.
//!
//! Entry, export, input, output and schema references have dedicated checks
//! and are skipped here. Calls through `Owner.method` and calls naming a
//! class are left to the method-call check.

use trellis_core::{Entity, EntityKind, Relation, graph::split_method_reference};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, article, at, with_help};

pub(super) struct References;

/// Whether `relation` may point at `kind`, with a description of what it
/// expects. `None` for relations checked elsewhere.
fn expected(relation: Relation, kind: EntityKind) -> Option<(bool, &'static str)> {
    let expected = match relation {
        Relation::Calls => (
            kind == EntityKind::Function || kind.is_class_like(),
            "a function",
        ),
        Relation::Affects | Relation::Contains => {
            (kind == EntityKind::UiComponent, "a UI component")
        }
        Relation::Consumes => (
            kind.is_consumable(),
            "a run parameter, asset, constants file or dependency",
        ),
        Relation::Methods => (kind == EntityKind::Function, "a function"),
        Relation::Base => (kind.is_class_like(), "a class or class file"),
        // Leftover entries that resolve have a kind no list accepts.
        Relation::Dependencies => (false, "a function, component, resource or DTO"),
        Relation::Imports => (true, "an entity"),
        Relation::Entry
        | Relation::Exports
        | Relation::Input
        | Relation::Output
        | Relation::Schema
        | Relation::Interfaces => return None,
    };
    Some(expected)
}

/// Relations this check looks at.
fn checked(relation: Relation) -> bool {
    expected(relation, EntityKind::Program).is_some()
}

impl References {
    fn unresolved(cx: &Context<'_>, entity: &Entity, relation: Relation, target: &str) -> Diagnostic {
        let diagnostic = at(
            Diagnostic::error(format!(
                "`{target}` in the {relation} of `{}` is not defined",
                entity.name()
            ))
            .with_code(ErrorCode::E201),
            entity,
            "referenced here",
        );
        with_help(diagnostic, cx.suggest_name(target))
    }
}

impl Check for References {
    fn name(&self) -> &'static str {
        "references"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();
        for entity in graph.iter() {
            for (relation, target) in entity.data().references() {
                if !checked(relation) {
                    continue;
                }

                if relation == Relation::Imports && target.ends_with(".*") {
                    if !graph.matches(target) {
                        diagnostics.emit(at(
                            Diagnostic::error(format!(
                                "no entity matches the import `{target}` of `{}`",
                                entity.name()
                            ))
                            .with_code(ErrorCode::E201),
                            entity,
                            "referenced here",
                        ));
                    }
                    continue;
                }

                let found = match graph.get(target) {
                    Some(found) => found,
                    None if relation == Relation::Calls
                        && split_method_reference(target)
                            .is_some_and(|(owner, _)| graph.contains(owner)) =>
                    {
                        continue;
                    }
                    None => {
                        diagnostics.emit(Self::unresolved(cx, entity, relation, target));
                        continue;
                    }
                };

                let Some((false, description)) = expected(relation, found.kind()) else {
                    continue;
                };
                diagnostics.emit(at(
                    Diagnostic::error(format!(
                        "`{target}` in the {relation} of `{}` is {} {}, expected {description}",
                        entity.name(),
                        article(found.kind()),
                        found.kind(),
                    ))
                    .with_code(ErrorCode::E216),
                    entity,
                    "referenced here",
                ));
            }
        }
    }
}

//! Dependency auto-distribution and back-reference derivation.
//!
//! A function's `~>` list mixes every kind of dependency. [`distribute`]
//! moves each resolvable name to the list its target kind implies, and
//! [`derive_back_references`] recomputes the inverse index from the forward
//! lists. [`link`] runs both and is safe to repeat.

use log::{debug, trace};
use trellis_core::{
    BackReferences, BackRelation, Entity, EntityData, EntityGraph, EntityKind, Relation,
};

use crate::error::{Diagnostic, ErrorCode};

/// Where a distributed dependency ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Calls,
    Affects,
    Consumes,
    Input,
    /// Unresolved, or of a kind no list accepts; stays for the validator.
    Keep,
}

fn destination(kind: Option<EntityKind>) -> Destination {
    match kind {
        Some(EntityKind::Function | EntityKind::Class | EntityKind::ClassFile) => Destination::Calls,
        Some(EntityKind::UiComponent) => Destination::Affects,
        Some(
            EntityKind::RunParameter
            | EntityKind::Asset
            | EntityKind::Constants
            | EntityKind::Dependency,
        ) => Destination::Consumes,
        Some(EntityKind::Dto) => Destination::Input,
        Some(EntityKind::Program | EntityKind::File) | None => Destination::Keep,
    }
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !list.contains(&name) {
        list.push(name);
    }
}

/// Distribute the pending dependencies of one function entity.
fn distribute_function(
    entity: &mut Entity,
    targets: Vec<(String, Destination)>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let name = entity.name().to_string();
    let position = entity.position();
    let origin = entity.origin().map(str::to_string);
    let EntityData::Function(function) = entity.data_mut() else {
        return;
    };

    let mut kept = Vec::new();
    for (dependency, destination) in targets {
        trace!(function = name.as_str(), dependency = dependency.as_str(); "Distributing dependency");
        match destination {
            Destination::Calls => push_unique(&mut function.calls, dependency),
            Destination::Affects => push_unique(&mut function.affects, dependency),
            Destination::Consumes => push_unique(&mut function.consumes, dependency),
            Destination::Input => match function.input.clone() {
                None => function.input = Some(dependency),
                Some(input) if input == dependency => {}
                Some(input) => diagnostics.push(
                    Diagnostic::warning(format!(
                        "`{name}` already takes `{input}` as input; DTO `{dependency}` is dropped"
                    ))
                    .with_code(ErrorCode::E110)
                    .with_position(position)
                    .with_help("a function takes at most one input DTO")
                    .or_document(origin.as_deref()),
                ),
            },
            Destination::Keep => {
                if !kept.contains(&dependency) {
                    kept.push(dependency);
                }
            }
        }
    }
    function.dependencies = kept;
}

/// Move every resolvable entry of each function's mixed dependency list into
/// `calls`, `affects`, `consumes` or `input` by the referenced kind.
///
/// `Owner.method` entries resolve by their owner. Unresolved names stay in
/// `dependencies`, so distributing again after an import merge picks them up.
/// Entries are never duplicated.
pub fn distribute(graph: &mut EntityGraph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let plans: Vec<(String, Vec<(String, Destination)>)> = graph
        .iter()
        .filter_map(|entity| match entity.data() {
            EntityData::Function(function) if !function.dependencies.is_empty() => {
                let targets = function
                    .dependencies
                    .iter()
                    .map(|dependency| {
                        let kind = graph.resolve(dependency).map(|target| target.kind());
                        (dependency.clone(), destination(kind))
                    })
                    .collect();
                Some((entity.name().to_string(), targets))
            }
            _ => None,
        })
        .collect();

    for (name, targets) in plans {
        if let Some(entity) = graph.get_mut(&name) {
            distribute_function(entity, targets, &mut diagnostics);
        }
    }

    diagnostics
}

/// Compute the back-reference index from the forward lists of every entity.
///
/// The result depends only on the forward lists, so deriving twice yields
/// the same index.
pub fn derive_back_references(graph: &EntityGraph) -> BackReferences {
    let mut back_references = BackReferences::new();
    for entity in graph.iter() {
        for (relation, target) in entity.data().references() {
            let inverse = match relation {
                Relation::Affects => BackRelation::AffectedBy,
                Relation::Consumes => BackRelation::ConsumedBy,
                Relation::Contains => BackRelation::ContainedBy,
                Relation::Imports => BackRelation::ImportedBy,
                _ => continue,
            };
            back_references.insert(inverse, target, entity.name());
        }
    }
    back_references
}

/// Distribute dependencies, then rebuild the back-reference index.
pub fn link(graph: &mut EntityGraph) -> Vec<Diagnostic> {
    debug!(entities = graph.len(); "Linking graph");
    let diagnostics = distribute(graph);
    let back_references = derive_back_references(graph);
    graph.set_back_references(back_references);
    diagnostics
}

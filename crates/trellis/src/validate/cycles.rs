//! Circular dependencies among file imports and along calls.
//!
//! Two dependency graphs are built over the entities:
//!
//! - the **import graph**: a file or class file depends on every file it
//!   imports, and on every file that explicitly exports a name it imports;
//! - the **call graph**: a program depends on its entry, a function on what
//!   it calls (`Owner.method` on the method itself when the owner lists it),
//!   and a class on those of its methods that are declared functions.
//!
//! Every strongly connected component with more than one node, or with a
//! self-loop, is one cycle. The reported path starts at the component's
//! first-declared entity and follows the shortest way back to it.

use std::collections::{HashMap, HashSet, VecDeque, hash_map::Entry};

use log::trace;
use petgraph::{
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
};
use trellis_core::{EntityData, EntityGraph, EntityId, EntityKind, graph::split_method_reference};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use super::{Check, Context, at};

pub(super) struct Cycles;

/// A dependency graph over entity ids.
struct DependencyGraph {
    graph: DiGraph<EntityId, ()>,
    nodes: HashMap<EntityId, NodeIndex>,
}

impl DependencyGraph {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        }
    }

    fn node(&mut self, id: EntityId) -> NodeIndex {
        *self
            .nodes
            .entry(id)
            .or_insert_with(|| self.graph.add_node(id))
    }

    fn depend(&mut self, from: EntityId, to: EntityId) {
        let from = self.node(from);
        let to = self.node(to);
        self.graph.update_edge(from, to, ());
    }

    /// One path per cycle, each starting and ending at the same entity.
    fn cycles(&self) -> Vec<Vec<EntityId>> {
        let mut cycles = Vec::new();
        for component in tarjan_scc(&self.graph) {
            let Some(&start) = component.iter().min_by_key(|node| self.graph[**node]) else {
                continue;
            };
            let is_cycle = component.len() > 1 || self.graph.contains_edge(start, start);
            if !is_cycle {
                continue;
            }
            let members: HashSet<NodeIndex> = component.iter().copied().collect();
            let path = self.path_back(start, &members);
            cycles.push(path.into_iter().map(|node| self.graph[node]).collect());
        }
        cycles.sort();
        cycles
    }

    /// Shortest path from `start` back to itself within `members`.
    fn path_back(&self, start: NodeIndex, members: &HashSet<NodeIndex>) -> Vec<NodeIndex> {
        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            let mut successors: Vec<NodeIndex> = self
                .graph
                .neighbors(node)
                .filter(|next| members.contains(next))
                .collect();
            successors.sort_by_key(|next| self.graph[*next]);

            for next in successors {
                if next == start {
                    let mut path = vec![node];
                    let mut current = node;
                    while let Some(&parent) = parents.get(&current) {
                        path.push(parent);
                        current = parent;
                    }
                    path.reverse();
                    path.push(start);
                    return path;
                }
                if let Entry::Vacant(entry) = parents.entry(next) {
                    entry.insert(node);
                    queue.push_back(next);
                }
            }
        }
        vec![start, start]
    }
}

fn import_graph(graph: &EntityGraph) -> DependencyGraph {
    let mut exporters: HashMap<&str, Vec<EntityId>> = HashMap::new();
    for entity in graph.iter().filter(|e| e.kind().is_file_like()) {
        let Some(id) = graph.id_of(entity.name()) else {
            continue;
        };
        for name in entity.data().exports() {
            exporters.entry(name.as_str()).or_default().push(id);
        }
    }

    let mut dependencies = DependencyGraph::new();
    for entity in graph.iter().filter(|e| e.kind().is_file_like()) {
        let Some(from) = graph.id_of(entity.name()) else {
            continue;
        };
        for import in entity.data().imports() {
            let imported = graph
                .get(import)
                .filter(|target| target.kind().is_file_like())
                .and_then(|target| graph.id_of(target.name()));
            if let Some(to) = imported {
                dependencies.depend(from, to);
            }
            // A file re-listing its own export is not a dependency on itself.
            for &to in exporters.get(import.as_str()).into_iter().flatten() {
                if to != from {
                    dependencies.depend(from, to);
                }
            }
        }
    }
    dependencies
}

fn call_graph(graph: &EntityGraph) -> DependencyGraph {
    let mut dependencies = DependencyGraph::new();
    let id = |name: &str| graph.id_of(name);
    let function = |name: &str| {
        graph
            .get(name)
            .filter(|target| target.kind() == EntityKind::Function)
            .and_then(|target| id(target.name()))
    };

    for entity in graph.iter() {
        let Some(from) = id(entity.name()) else {
            continue;
        };
        let targets: Vec<Option<EntityId>> = match entity.data() {
            EntityData::Program(program) => vec![id(program.entry.as_str())],
            EntityData::Function(function_data) => function_data
                .calls
                .iter()
                .map(|target| match id(target.as_str()) {
                    Some(to) => Some(to),
                    // `Owner.method` only depends on a listed method.
                    None => split_method_reference(target).and_then(|(owner, method)| {
                        let owner = graph.get(owner)?;
                        if owner.data().methods().iter().any(|m| m == method) {
                            function(method)
                        } else {
                            None
                        }
                    }),
                })
                .collect(),
            data if entity.kind().is_class_like() => {
                data.methods().iter().map(|method| function(method.as_str())).collect()
            }
            _ => continue,
        };

        for to in targets.into_iter().flatten() {
            dependencies.depend(from, to);
        }
    }
    dependencies
}

impl Cycles {
    fn report(
        cx: &Context<'_>,
        cycle: &[EntityId],
        what: &str,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let graph = cx.graph();
        let Some(&first) = cycle.first() else {
            return;
        };
        let path: Vec<&str> = cycle.iter().map(|id| graph.entity(*id).name()).collect();
        let path = path.join(" -> ");
        trace!(path = path.as_str(); "Cycle found");

        let start = graph.entity(first);
        diagnostics.emit(at(
            Diagnostic::error(format!("circular {what}: {path}"))
                .with_code(ErrorCode::E202)
                .with_help("break the cycle by removing one of the dependencies"),
            start,
            "cycle starts here",
        ));
    }
}

impl Check for Cycles {
    fn name(&self) -> &'static str {
        "cycles"
    }

    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector) {
        let graph = cx.graph();
        for cycle in import_graph(graph).cycles() {
            Self::report(cx, &cycle, "import", diagnostics);
        }
        for cycle in call_graph(graph).cycles() {
            Self::report(cx, &cycle, "call", diagnostics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::test_support::{codes, run_check};

    #[test]
    fn test_mutual_imports() {
        let diagnostics = run_check(Cycles, "A @ a.ts\n  <- B\nB @ b.ts\n  <- A\n");

        assert_eq!(codes(&diagnostics), [ErrorCode::E202]);
        assert_eq!(diagnostics[0].message(), "circular import: A -> B -> A");
        assert_eq!(diagnostics[0].position().line(), 1);
    }

    #[test]
    fn test_self_import() {
        let diagnostics = run_check(Cycles, "A @ a.ts\n  <- A\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), "circular import: A -> A");
    }

    #[test]
    fn test_import_through_exported_name() {
        let diagnostics = run_check(
            Cycles,
            "A @ a.ts\n  <- helper\n  -> run\nB @ b.ts\n  <- run\n  -> helper\nrun :: () => void\nhelper :: () => void\n",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), "circular import: A -> B -> A");
    }

    #[test]
    fn test_importing_own_export_is_not_a_cycle() {
        let diagnostics = run_check(Cycles, "A @ a.ts\n  <- run\n  -> run\nrun :: () => void\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_call_cycle_through_method() {
        let diagnostics = run_check(
            Cycles,
            "Store <: _\n  > load, save\nload :: () => void\n  => run\nsave :: () => void\nrun :: () => void\n  => Store.load\nother :: () => void\n  => Store.save\n",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), "circular call: load -> run -> load");
    }

    #[test]
    fn test_unlisted_method_call_is_not_a_cycle() {
        let diagnostics = run_check(
            Cycles,
            "Store <: _\n  > load\nload :: () => void\n  => Store.other\n",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_listed_method_without_function_is_not_a_cycle() {
        let diagnostics = run_check(
            Cycles,
            "Store <: _\n  > load, ghost\nload :: () => void\n  => Store.ghost\n",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_acyclic_graph() {
        let diagnostics = run_check(
            Cycles,
            "Shop -> Main\nMain @ main.ts\n  <- Lib\nLib @ lib.ts\na :: () => void\n  => b\nb :: () => void\n",
        );
        assert!(diagnostics.is_empty());
    }
}

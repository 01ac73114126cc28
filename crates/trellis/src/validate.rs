//! Semantic validation of an assembled entity graph.
//!
//! Validation is a set of independent [`Check`]s. Each check reads the graph
//! and emits zero or more diagnostics; a check never stops the others, and
//! the order checks run in does not change the result. The collected
//! diagnostics are ordered by document, line and column.
//!
//! # Checks
//!
//! | check | codes |
//! |---|---|
//! | orphans | `E200` |
//! | reference existence and kinds | `E201`, `E216` |
//! | circular dependencies | `E202` |
//! | entry point | `E203`, `E204`, `E205` |
//! | unique paths | `E206` |
//! | export coverage | `E207` |
//! | duplicate exports | `E208` |
//! | method calls | `E209` |
//! | undefined exports | `E210` |
//! | DTO contracts | `E211` |
//! | capabilities | `E212`, `E213` |
//! | naming conflicts | `E214`, `E215` |

mod capabilities;
mod cycles;
mod dto;
mod entry;
mod exports;
mod methods;
mod naming;
mod orphans;
mod paths;
mod references;

use log::{debug, trace};
use trellis_core::{Entity, EntityGraph, EntityKind};
use trellis_parser::error::{Diagnostic, DiagnosticCollector};

use crate::{config::ValidationConfig, report::ValidationReport, suggest::suggest};

/// One independent validation rule.
pub trait Check {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect the graph and emit findings.
    fn run(&self, cx: &Context<'_>, diagnostics: &mut DiagnosticCollector);
}

/// Read-only view shared by all checks.
pub struct Context<'g> {
    graph: &'g EntityGraph,
    config: &'g ValidationConfig,
}

impl<'g> Context<'g> {
    pub fn new(graph: &'g EntityGraph, config: &'g ValidationConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &'g EntityGraph {
        self.graph
    }

    /// A "did you mean" help text for `name`, or `None` when suggestions are
    /// disabled or nothing is similar enough.
    pub fn suggestion<I>(&self, name: &str, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = &'g str>,
    {
        if !self.config.suggestions() {
            return None;
        }
        suggest(name, candidates, self.config.similarity_threshold())
            .map(|candidate| format!("did you mean `{candidate}`?"))
    }

    /// Suggest among every entity name.
    pub fn suggest_name(&self, name: &str) -> Option<String> {
        self.suggestion(name, self.graph.names())
    }
}

/// Anchor `diagnostic` on `entity`: its position, its declaration span and
/// its document.
pub(crate) fn at(diagnostic: Diagnostic, entity: &Entity, label: &str) -> Diagnostic {
    diagnostic
        .with_position(entity.position())
        .with_label(entity.span(), label)
        .or_document(entity.origin())
}

/// Attach `help` when there is one.
pub(crate) fn with_help(diagnostic: Diagnostic, help: Option<String>) -> Diagnostic {
    match help {
        Some(help) => diagnostic.with_help(help),
        None => diagnostic,
    }
}

/// The indefinite article for a kind's display name.
pub(crate) fn article(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Asset => "an",
        _ => "a",
    }
}

/// Runs a set of checks over a graph.
pub struct Validator {
    config: ValidationConfig,
    checks: Vec<Box<dyn Check>>,
}

impl Validator {
    /// A validator running every built-in check.
    pub fn new(config: ValidationConfig) -> Self {
        let checks: Vec<Box<dyn Check>> = vec![
            Box::new(orphans::Orphans),
            Box::new(references::References),
            Box::new(cycles::Cycles),
            Box::new(entry::EntryPoint),
            Box::new(paths::UniquePaths),
            Box::new(exports::ExportCoverage),
            Box::new(exports::DuplicateExports),
            Box::new(methods::MethodCalls),
            Box::new(exports::UndefinedExports),
            Box::new(dto::DtoContracts),
            Box::new(capabilities::Capabilities),
            Box::new(naming::NamingConflicts),
        ];
        Self { config, checks }
    }

    /// A validator running only `checks`.
    pub fn with_checks(config: ValidationConfig, checks: Vec<Box<dyn Check>>) -> Self {
        Self { config, checks }
    }

    /// Names of the checks, in run order.
    pub fn check_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.name())
    }

    /// Run every check and return the ordered diagnostics.
    pub fn run(&self, graph: &EntityGraph) -> Vec<Diagnostic> {
        debug!(entities = graph.len(), checks = self.checks.len(); "Validating graph");
        let cx = Context::new(graph, &self.config);
        let mut diagnostics = DiagnosticCollector::new();
        for check in &self.checks {
            let before = diagnostics.len();
            check.run(&cx, &mut diagnostics);
            trace!(check = check.name(), findings = diagnostics.len() - before; "Check finished");
        }
        let diagnostics = diagnostics.finish();
        debug!(findings = diagnostics.len(); "Validation finished");
        diagnostics
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

/// Validate `graph` with every built-in check.
pub fn validate(graph: &EntityGraph, config: &ValidationConfig) -> ValidationReport {
    ValidationReport::new(Validator::new(config.clone()).run(graph))
}


#[cfg(test)]
mod tests {
    use trellis_parser::parse;

    use super::*;

    #[test]
    fn test_every_check_runs() {
        let names: Vec<_> = Validator::default().check_names().collect();
        assert_eq!(names.len(), 12);
        assert!(names.contains(&"cycles"));
    }

    #[test]
    fn test_suggestions_can_be_disabled() {
        let graph = parse("formatPrice :: () => void\n").graph;
        let enabled = ValidationConfig::default();
        let disabled = ValidationConfig::new(false, 0.6);

        assert!(Context::new(&graph, &enabled).suggest_name("formatPrise").is_some());
        assert!(Context::new(&graph, &disabled).suggest_name("formatPrise").is_none());
    }
}

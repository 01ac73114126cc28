//! Derived inverse relationships.
//!
//! Back-references are never authored. They are computed from the forward
//! lists of every entity and stored in a [`BackReferences`] index owned by the
//! graph, which the linker replaces wholesale on every run.

use indexmap::IndexMap;
use serde::Serialize;

/// The derived inverse of a forward relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BackRelation {
    /// Inverse of `affects`.
    AffectedBy,
    /// Inverse of `consumes`.
    ConsumedBy,
    /// Inverse of `contains`.
    ContainedBy,
    /// Inverse of `imports`.
    ImportedBy,
}

/// Index of derived back-references keyed by target entity name.
///
/// Source lists preserve the order in which sources were visited and never
/// contain the same source twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackReferences {
    affected_by: IndexMap<String, Vec<String>>,
    consumed_by: IndexMap<String, Vec<String>>,
    contained_by: IndexMap<String, Vec<String>>,
    imported_by: IndexMap<String, Vec<String>>,
}

impl BackReferences {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` points at `target` through the forward
    /// counterpart of `relation`.
    pub fn insert(&mut self, relation: BackRelation, target: &str, source: &str) {
        let sources = self
            .map_mut(relation)
            .entry(target.to_string())
            .or_default();
        if !sources.iter().any(|existing| existing == source) {
            sources.push(source.to_string());
        }
    }

    /// Sources pointing at `target` through `relation`.
    pub fn get(&self, relation: BackRelation, target: &str) -> &[String] {
        self.map(relation)
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// UI components and functions that affect `target`.
    pub fn affected_by(&self, target: &str) -> &[String] {
        self.get(BackRelation::AffectedBy, target)
    }

    /// Functions consuming `target`.
    pub fn consumed_by(&self, target: &str) -> &[String] {
        self.get(BackRelation::ConsumedBy, target)
    }

    /// UI components containing `target`.
    pub fn contained_by(&self, target: &str) -> &[String] {
        self.get(BackRelation::ContainedBy, target)
    }

    /// Files and class files importing `target`.
    pub fn imported_by(&self, target: &str) -> &[String] {
        self.get(BackRelation::ImportedBy, target)
    }

    /// Iterate `(target, sources)` pairs of one relation.
    pub fn iter(&self, relation: BackRelation) -> impl Iterator<Item = (&str, &[String])> {
        self.map(relation)
            .iter()
            .map(|(target, sources)| (target.as_str(), sources.as_slice()))
    }

    /// Whether no back-reference has been recorded.
    pub fn is_empty(&self) -> bool {
        self.affected_by.is_empty()
            && self.consumed_by.is_empty()
            && self.contained_by.is_empty()
            && self.imported_by.is_empty()
    }

    fn map(&self, relation: BackRelation) -> &IndexMap<String, Vec<String>> {
        match relation {
            BackRelation::AffectedBy => &self.affected_by,
            BackRelation::ConsumedBy => &self.consumed_by,
            BackRelation::ContainedBy => &self.contained_by,
            BackRelation::ImportedBy => &self.imported_by,
        }
    }

    fn map_mut(&mut self, relation: BackRelation) -> &mut IndexMap<String, Vec<String>> {
        match relation {
            BackRelation::AffectedBy => &mut self.affected_by,
            BackRelation::ConsumedBy => &mut self.consumed_by,
            BackRelation::ContainedBy => &mut self.contained_by,
            BackRelation::ImportedBy => &mut self.imported_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates_sources() {
        let mut refs = BackReferences::new();
        refs.insert(BackRelation::AffectedBy, "Header", "render");
        refs.insert(BackRelation::AffectedBy, "Header", "render");
        refs.insert(BackRelation::AffectedBy, "Header", "update");

        assert_eq!(refs.affected_by("Header"), ["render", "update"]);
    }

    #[test]
    fn test_missing_target_is_empty() {
        let refs = BackReferences::new();
        assert!(refs.imported_by("Nothing").is_empty());
        assert!(refs.is_empty());
    }

    #[test]
    fn test_relations_are_separate() {
        let mut refs = BackReferences::new();
        refs.insert(BackRelation::ImportedBy, "React", "Main");

        assert_eq!(refs.imported_by("React"), ["Main"]);
        assert!(refs.consumed_by("React").is_empty());
        assert_eq!(refs.iter(BackRelation::ImportedBy).count(), 1);
    }
}

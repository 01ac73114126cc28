//! The name-indexed entity graph.
//!
//! [`EntityGraph`] is an arena of [`Entity`] records with an insertion-ordered
//! name index. Names are unique: inserting a name that already exists keeps
//! the first definition and preserves the rejected one in
//! [`EntityGraph::duplicates`] so the validator can report it.

use indexmap::IndexMap;
use log::trace;
use serde::Serialize;
use thiserror::Error;

use crate::{
    backrefs::BackReferences,
    entity::{Entity, EntityKind},
};

/// Index of an entity in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(usize);

impl EntityId {
    /// The arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Returned when an inserted entity's name is already taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity `{name}` is already defined")]
pub struct DuplicateEntity {
    pub name: String,
    /// The definition that keeps the name.
    pub original: EntityId,
}

/// An entity rejected by [`EntityGraph::insert`] because its name was taken.
#[derive(Debug, Clone, Serialize)]
pub struct Duplicate {
    entity: Entity,
    original: EntityId,
}

impl Duplicate {
    /// The rejected entity.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// The entity that kept the name.
    pub fn original(&self) -> EntityId {
        self.original
    }
}

/// Arena of entities with a unique name index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityGraph {
    entities: Vec<Entity>,
    index: IndexMap<String, EntityId>,
    duplicates: Vec<Duplicate>,
    back_references: BackReferences,
}

impl EntityGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity under its name.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateEntity`] if the name is taken. The rejected entity is
    /// kept in [`duplicates`](Self::duplicates); the original is untouched.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, DuplicateEntity> {
        if let Some(&original) = self.index.get(entity.name()) {
            trace!(name = entity.name(); "Duplicate entity name");
            let err = DuplicateEntity {
                name: entity.name().to_string(),
                original,
            };
            self.duplicates.push(Duplicate { entity, original });
            return Err(err);
        }

        let id = EntityId(self.entities.len());
        self.index.insert(entity.name().to_string(), id);
        self.entities.push(entity);
        Ok(id)
    }

    /// Record a duplicate found outside [`insert`](Self::insert), e.g. while
    /// merging another graph.
    pub fn push_duplicate(&mut self, entity: Entity, original: EntityId) {
        self.duplicates.push(Duplicate { entity, original });
    }

    /// Look up an entity by exact name.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|id| &self.entities[id.0])
    }

    /// Look up an entity by exact name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        let id = *self.index.get(name)?;
        Some(&mut self.entities[id.0])
    }

    /// Look up the id of a name.
    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.index.get(name).copied()
    }

    /// Get an entity by id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph.
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    /// Resolve a reference that may be a method reference.
    ///
    /// Exact names win; otherwise `Owner.method` resolves to `Owner`. Names
    /// merged under an alias contain dots themselves, so the split happens at
    /// the last dot.
    pub fn resolve(&self, reference: &str) -> Option<&Entity> {
        self.get(reference).or_else(|| {
            let (owner, _) = split_method_reference(reference)?;
            self.get(owner)
        })
    }

    /// Whether any entity name matches `pattern`.
    ///
    /// Patterns ending in `.*` match every name with that prefix.
    pub fn matches(&self, pattern: &str) -> bool {
        match pattern.strip_suffix(".*") {
            Some(prefix) => self.index.keys().any(|name| {
                name.strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|rest| !rest.is_empty())
            }),
            None => self.index.contains_key(pattern),
        }
    }

    /// Whether an entity has this exact name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate entities in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate entities mutably in declaration order.
    ///
    /// Entities must not be renamed through this iterator; the name index
    /// would go stale.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Iterate entities of one kind in declaration order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| entity.kind() == kind)
    }

    /// All entity names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the graph holds no entity.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities rejected because their name was already taken.
    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    /// The derived back-reference index.
    pub fn back_references(&self) -> &BackReferences {
        &self.back_references
    }

    /// Replace the derived back-reference index.
    pub fn set_back_references(&mut self, back_references: BackReferences) {
        self.back_references = back_references;
    }

    /// Mark every entity, duplicates included, as merged from `origin`.
    pub fn set_origin(&mut self, origin: &str) {
        let entities = self.entities.iter_mut();
        let duplicates = self.duplicates.iter_mut().map(|duplicate| &mut duplicate.entity);
        for entity in entities.chain(duplicates) {
            entity.set_origin(origin);
        }
    }

    /// Consume the graph, returning its entities and duplicates.
    pub fn into_parts(self) -> (Vec<Entity>, Vec<Duplicate>) {
        (self.entities, self.duplicates)
    }
}

/// Split `Owner.method` at its last dot.
///
/// Returns `None` when the reference has no dot or an empty side.
pub fn split_method_reference(reference: &str) -> Option<(&str, &str)> {
    let (owner, method) = reference.rsplit_once('.')?;
    if owner.is_empty() || method.is_empty() {
        return None;
    }
    Some((owner, method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entity::EntityData, span::Position};

    fn entity(name: &str, kind: EntityKind) -> Entity {
        Entity::new(name, Position::start(), EntityData::empty(kind))
    }

    #[test]
    fn test_insert_and_get() {
        let mut graph = EntityGraph::new();
        let id = graph.insert(entity("Main", EntityKind::File)).unwrap();

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.entity(id).name(), "Main");
        assert_eq!(graph.get("Main").map(|e| e.kind()), Some(EntityKind::File));
        assert!(graph.get("main").is_none(), "names are case-sensitive");
    }

    #[test]
    fn test_duplicate_keeps_first_definition() {
        let mut graph = EntityGraph::new();
        graph.insert(entity("Store", EntityKind::Class)).unwrap();

        let err = graph.insert(entity("Store", EntityKind::File)).unwrap_err();

        assert_eq!(err.name, "Store");
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get("Store").map(|e| e.kind()), Some(EntityKind::Class));
        assert_eq!(graph.duplicates().len(), 1);
        assert_eq!(graph.duplicates()[0].entity().kind(), EntityKind::File);
        assert_eq!(graph.duplicates()[0].original(), err.original);
    }

    #[test]
    fn test_resolve_method_reference() {
        let mut graph = EntityGraph::new();
        graph.insert(entity("Store", EntityKind::Class)).unwrap();
        graph.insert(entity("ui.Button", EntityKind::UiComponent)).unwrap();

        assert_eq!(graph.resolve("Store.load").map(|e| e.name()), Some("Store"));
        assert_eq!(graph.resolve("ui.Button").map(|e| e.name()), Some("ui.Button"));
        assert!(graph.resolve("Missing.load").is_none());
    }

    #[test]
    fn test_wildcard_matches() {
        let mut graph = EntityGraph::new();
        graph.insert(entity("ui.Button", EntityKind::UiComponent)).unwrap();
        graph.insert(entity("uikit", EntityKind::File)).unwrap();

        assert!(graph.matches("ui.*"));
        assert!(!graph.matches("api.*"));
        assert!(!graph.matches("uik.*"));
        assert!(graph.matches("uikit"));
    }

    #[test]
    fn test_split_method_reference() {
        assert_eq!(split_method_reference("Store.load"), Some(("Store", "load")));
        assert_eq!(split_method_reference("ns.Store.load"), Some(("ns.Store", "load")));
        assert_eq!(split_method_reference("plain"), None);
        assert_eq!(split_method_reference("trailing."), None);
    }

    #[test]
    fn test_of_kind_preserves_order() {
        let mut graph = EntityGraph::new();
        graph.insert(entity("b", EntityKind::Function)).unwrap();
        graph.insert(entity("Main", EntityKind::File)).unwrap();
        graph.insert(entity("a", EntityKind::Function)).unwrap();

        let names: Vec<_> = graph.of_kind(EntityKind::Function).map(|e| e.name()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}

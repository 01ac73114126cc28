//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types shared by every stage of the
//! Trellis architecture language. It includes:
//!
//! - **Source locations**: Byte spans and 1-based line/column positions ([`span`] module)
//! - **Entities**: The tagged union of the eleven entity kinds ([`entity`] module)
//! - **Graph**: A name-indexed entity arena with duplicate detection ([`graph`] module)
//! - **Back-references**: Derived inverse relationships ([`backrefs`] module)

pub mod backrefs;
pub mod entity;
pub mod graph;
pub mod span;

pub use backrefs::{BackReferences, BackRelation};
pub use entity::{Entity, EntityData, EntityKind, Relation, RunParameterKind};
pub use graph::{DuplicateEntity, EntityGraph, EntityId};
pub use span::{Position, Span, Spanned};

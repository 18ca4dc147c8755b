//! Entity, component, relationship, and participant-index storage for Orrery.
//!
//! This crate provides:
//! - [`EntityStore`] - Generational entity allocation
//! - [`ComponentStore`] - Keyword-registered component values
//! - [`RelationshipStore`] - Relationship entities with typed role slots
//! - [`ParticipantIndexStore`] - Opt-in per-entity relationship caches
//! - [`World`] - The mutable facade tying the stores together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod component;
mod entity;
mod index;
mod relationship;
mod schema;
mod world;

pub use component::ComponentStore;
pub use entity::EntityStore;
pub use index::{IndexEntry, ParticipantIndexStore};
pub use relationship::{RelationshipRecord, RelationshipStore, SlotAssignment};
pub use schema::{RelationshipSchema, RoleSchema, SlotCardinality};
pub use world::World;

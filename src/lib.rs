//! Orrery - Simulation backbone
//!
//! This crate re-exports all layers of the Orrery system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: orrery_engine     — Phase classification, scheduling, frames, GC
//! Layer 1: orrery_storage    — Entity-component storage, relationships, indices
//! Layer 0: orrery_foundation — Core types (Value, EntityId, Error)
//! ```

pub use orrery_engine as engine;
pub use orrery_foundation as foundation;
pub use orrery_storage as storage;

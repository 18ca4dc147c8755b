//! Entity identifiers with generational indices.

use std::fmt;

/// Handle to an entity: a slot index paired with a generation counter.
///
/// Slots are recycled when entities are destroyed; the generation is bumped on
/// each recycle so a stale handle to the old occupant can never be confused
/// with the new one. Handles are plain data and carry no behavior.
///
/// Ordering is by slot index, then generation, which gives deterministic
/// iteration when handles are collected into ordered containers.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId {
    /// Slot index into entity storage.
    pub slot: u32,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl EntityId {
    /// Creates an entity handle from a slot index and generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// The "no entity" sentinel; never allocated by a store.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            slot: u32::MAX,
            generation: 0,
        }
    }

    /// Returns true if this is the null sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.slot == u32::MAX
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({}g{})", self.slot, self.generation)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "entity(null)")
        } else {
            write!(f, "entity({})", self.slot)
        }
    }
}

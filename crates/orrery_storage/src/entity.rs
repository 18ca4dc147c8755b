//! Entity lifecycle management with generational slots.
//!
//! The `EntityStore` allocates entity slots and tracks a generation per slot
//! so stale handles to destroyed entities are detected by generation
//! mismatch rather than by dangling references.

use orrery_foundation::{EntityId, Error, Result};

/// Per-slot allocation state.
#[derive(Clone, Copy, Debug)]
struct Slot {
    /// Generation of the current (or most recent) occupant.
    generation: u32,
    /// Whether the slot currently holds a live entity.
    alive: bool,
}

/// Manages entity allocation, destruction, and liveness checks.
///
/// Destroyed slots go on a free list; respawning from the free list bumps the
/// generation, so the recycled handle never equals the stale one.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl EntityStore {
    /// Creates a new empty entity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new live entity.
    pub fn spawn(&mut self) -> EntityId {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.generation += 1;
            entry.alive = true;
            EntityId::new(slot, entry.generation)
        } else {
            let slot = u32::try_from(self.slots.len()).unwrap_or(u32::MAX - 1);
            self.slots.push(Slot {
                generation: 1,
                alive: true,
            });
            EntityId::new(slot, 1)
        }
    }

    /// Destroys a live entity, freeing its slot for reuse.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale or never existed.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        self.validate(id)?;
        self.slots[id.slot as usize].alive = false;
        self.free.push(id.slot);
        self.live -= 1;
        Ok(())
    }

    /// Returns true if the handle refers to a live entity.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.slot as usize)
            .is_some_and(|s| s.alive && s.generation == id.generation)
    }

    /// Validates a handle, distinguishing stale from never-allocated.
    ///
    /// # Errors
    ///
    /// Returns [`orrery_foundation::ErrorKind::StaleEntity`] on generation
    /// mismatch and [`orrery_foundation::ErrorKind::EntityNotFound`] for
    /// out-of-range or freed slots.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let Some(slot) = self.slots.get(id.slot as usize) else {
            return Err(Error::entity_not_found(id));
        };
        if slot.generation != id.generation {
            return Err(Error::stale_entity(id));
        }
        if !slot.alive {
            return Err(Error::entity_not_found(id));
        }
        Ok(())
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no entities are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates over all live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.alive)
            .map(|(i, s)| EntityId::new(u32::try_from(i).unwrap_or(u32::MAX), s.generation))
    }
}

//! Deferred structural commands.
//!
//! Structural mutations — entity create/destroy, component set/remove,
//! relationship create/destroy — are never applied while a phase is running.
//! Routines queue them into a `CommandBuffer`; the executor replays the queue
//! at the phase boundary, so in-flight iteration over the live component and
//! relationship sets never observes a half-applied edit.

use orrery_foundation::{EntityId, KeywordId, Result, Value};
use orrery_storage::{SlotAssignment, World};

/// One deferred structural mutation.
#[derive(Clone, Debug)]
pub enum Command {
    /// Set a component value on an entity.
    SetComponent {
        /// Target entity.
        entity: EntityId,
        /// Component type.
        component: KeywordId,
        /// Value to store.
        value: Value,
    },
    /// Remove a component from an entity.
    RemoveComponent {
        /// Target entity.
        entity: EntityId,
        /// Component type.
        component: KeywordId,
    },
    /// Destroy an entity (idempotent at flush time).
    DestroyEntity(EntityId),
    /// Attach a relationship record to an eagerly reserved entity.
    InsertRelationship {
        /// The reserved relationship entity.
        entity: EntityId,
        /// Relationship kind.
        kind: KeywordId,
        /// Validated slot assignments.
        assignments: Vec<SlotAssignment>,
    },
    /// Destroy a relationship entity.
    DestroyRelationship(EntityId),
}

/// A queue of deferred commands, replayed at a phase boundary.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    queue: Vec<Command>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a command.
    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Replays the queue against the world in submission order, draining it.
    ///
    /// Commands addressing entities that died earlier in the same flush are
    /// skipped: a destroy already queued wins over a late write, and
    /// destroying an already-dead entity is a no-op. Returns the number of
    /// commands actually applied.
    ///
    /// # Errors
    ///
    /// Propagates relationship validation failures; these indicate an
    /// authoring bug, not a transient condition.
    pub fn flush(&mut self, world: &mut World) -> Result<usize> {
        let mut applied = 0;
        for command in self.queue.drain(..) {
            match command {
                Command::SetComponent {
                    entity,
                    component,
                    value,
                } => {
                    if world.is_alive(entity) {
                        world.set(entity, component, value)?;
                        applied += 1;
                    }
                }
                Command::RemoveComponent { entity, component } => {
                    if world.is_alive(entity) {
                        world.remove_component(entity, component)?;
                        applied += 1;
                    }
                }
                Command::DestroyEntity(entity) => {
                    if world.is_alive(entity) {
                        world.destroy(entity)?;
                        applied += 1;
                    }
                }
                Command::InsertRelationship {
                    entity,
                    kind,
                    assignments,
                } => {
                    if world.is_alive(entity) {
                        world.insert_relationship(entity, kind, &assignments)?;
                        applied += 1;
                    }
                }
                Command::DestroyRelationship(entity) => {
                    if world.is_alive(entity) && world.is_relationship(entity) {
                        world.destroy_relationship(entity)?;
                        applied += 1;
                    }
                }
            }
        }
        Ok(applied)
    }
}

//! The routine trait and the context handed to running routines.
//!
//! A routine is one unit of per-frame update logic. It runs synchronously to
//! completion — no blocking, no suspension — and touches the world only in
//! the ways its access declaration promised. Structural mutations go through
//! the context, which defers them to the phase boundary.

use orrery_foundation::{EntityId, KeywordId, Result, Value};
use orrery_storage::{SlotAssignment, World};

use crate::command::{Command, CommandBuffer};

/// One unit of per-frame update logic.
pub trait Routine {
    /// Runs the routine for the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the frame; the executor propagates it.
    fn run(&mut self, ctx: &mut FrameContext<'_>) -> Result<()>;
}

/// A routine backed by a closure or function.
///
/// The preferred way to define small routines without a dedicated type.
pub struct FnRoutine<F>(F);

impl<F> FnRoutine<F>
where
    F: FnMut(&mut FrameContext<'_>) -> Result<()>,
{
    /// Wraps a closure as a routine.
    pub fn new(f: F) -> Self {
        Self(f)
    }

    /// Wraps a closure as a boxed routine, ready for registration.
    #[must_use]
    pub fn boxed(f: F) -> Box<dyn Routine>
    where
        F: 'static,
    {
        Box::new(Self(f))
    }
}

impl<F> Routine for FnRoutine<F>
where
    F: FnMut(&mut FrameContext<'_>) -> Result<()>,
{
    fn run(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        (self.0)(ctx)
    }
}

/// Execution context handed to a routine for one phase of one frame.
///
/// Component reads and in-place writes go straight through [`Self::world`];
/// structural mutations queue into the frame's command buffer and land at the
/// phase boundary. Entity identifiers for deferred creates are reserved
/// eagerly so the creation calls can hand back a handle immediately.
pub struct FrameContext<'a> {
    /// The live world. Reads reflect state as of the last structural flush.
    pub world: &'a mut World,
    commands: &'a mut CommandBuffer,
    /// Seconds elapsed since the previous frame.
    pub delta: f64,
    /// The current frame number, starting at 1.
    pub frame: u64,
}

impl<'a> FrameContext<'a> {
    /// Creates a context over a world and a command buffer.
    pub fn new(
        world: &'a mut World,
        commands: &'a mut CommandBuffer,
        delta: f64,
        frame: u64,
    ) -> Self {
        Self {
            world,
            commands,
            delta,
            frame,
        }
    }

    /// Creates an entity with initial components.
    ///
    /// The handle is live immediately; the component values land at the
    /// phase flush.
    pub fn create_entity(&mut self, components: Vec<(KeywordId, Value)>) -> EntityId {
        let entity = self.world.spawn();
        for (component, value) in components {
            self.commands.push(Command::SetComponent {
                entity,
                component,
                value,
            });
        }
        entity
    }

    /// Queues destruction of an entity.
    pub fn destroy_entity(&mut self, entity: EntityId) {
        self.commands.push(Command::DestroyEntity(entity));
    }

    /// Queues a component write.
    pub fn set_component(&mut self, entity: EntityId, component: KeywordId, value: Value) {
        self.commands.push(Command::SetComponent {
            entity,
            component,
            value,
        });
    }

    /// Queues a component removal.
    pub fn remove_component(&mut self, entity: EntityId, component: KeywordId) {
        self.commands.push(Command::RemoveComponent { entity, component });
    }

    /// Creates a relationship entity with the given slot assignments.
    ///
    /// The handle is live immediately; the record lands at the phase flush,
    /// so iteration over relationships of this kind does not see it until
    /// then.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown kind, unknown role, or slot arity
    /// violation; nothing is queued on error.
    pub fn create_relationship(
        &mut self,
        kind: KeywordId,
        assignments: Vec<SlotAssignment>,
    ) -> Result<EntityId> {
        self.world.validate_relationship(kind, &assignments)?;
        let entity = self.world.spawn();
        self.commands.push(Command::InsertRelationship {
            entity,
            kind,
            assignments,
        });
        Ok(entity)
    }

    /// Queues destruction of a relationship entity.
    pub fn destroy_relationship(&mut self, entity: EntityId) {
        self.commands.push(Command::DestroyRelationship(entity));
    }

    /// Number of commands queued so far this phase.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }
}

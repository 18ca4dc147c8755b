//! The frame executor.
//!
//! Owns the registry and the computed schedule, and drives one frame at a
//! time: each phase runs its routines in schedule order against a fresh
//! command buffer, the buffer flushes at the phase boundary, and after the
//! last phase the participant indices are rebuilt from the settled
//! relationship set. The built-in dependency collector is registered
//! automatically, so a host gets cascade cleanup without asking.

use orrery_foundation::Result;
use orrery_storage::World;

use crate::access::{AccessDeclaration, Phase};
use crate::command::CommandBuffer;
use crate::config::EngineConfig;
use crate::constraint::OrderingConstraint;
use crate::gc::{DependencyGc, GC_ROUTINE_NAME};
use crate::routine::{FrameContext, Routine};
use crate::schedule::{RoutineRegistry, Schedule};

/// Summary of one completed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// The frame number just completed.
    pub frame: u64,
    /// Routines that ran to completion.
    pub routines_run: usize,
    /// Deferred commands applied across all phase flushes.
    pub commands_applied: usize,
}

/// Drives registered routines through the four phases of each frame.
pub struct FrameExecutor {
    registry: RoutineRegistry,
    schedule: Schedule,
    config: EngineConfig,
    frame: u64,
}

impl FrameExecutor {
    /// Builds an executor over a registry, computing the initial schedule.
    ///
    /// The dependency collector is registered under [`GC_ROUTINE_NAME`]
    /// unless the registry already carries that name.
    ///
    /// # Errors
    ///
    /// Propagates schedule construction failures.
    pub fn new(mut registry: RoutineRegistry, config: EngineConfig) -> Result<Self> {
        if !registry.contains(GC_ROUTINE_NAME) {
            registry.register(
                GC_ROUTINE_NAME,
                DependencyGc::declaration(),
                vec![],
                Box::new(DependencyGc::new(config.max_gc_passes)),
            )?;
        }
        let schedule = Schedule::build(&registry, &config)?;
        Ok(Self {
            registry,
            schedule,
            config,
            frame: 0,
        })
    }

    /// Registers another routine and recomputes the schedule.
    ///
    /// On failure the registration is rolled back and the previous schedule
    /// stays in force.
    ///
    /// # Errors
    ///
    /// Returns registration or schedule construction failures.
    pub fn register(
        &mut self,
        name: &str,
        declaration: AccessDeclaration,
        constraints: Vec<OrderingConstraint>,
        routine: Box<dyn Routine>,
    ) -> Result<()> {
        let checkpoint = self.registry.len();
        self.registry.register(name, declaration, constraints, routine)?;
        match Schedule::build(&self.registry, &self.config) {
            Ok(schedule) => {
                self.schedule = schedule;
                Ok(())
            }
            Err(e) => {
                self.registry.truncate(checkpoint);
                Err(e)
            }
        }
    }

    /// The current schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Frames completed so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns true if a routine with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Runs one frame against the world.
    ///
    /// Phases run in fixed order; within a phase, routines run in schedule
    /// order, queueing structural mutations into a buffer that flushes at the
    /// phase boundary. After the reactive phase the participant indices are
    /// rebuilt, so a frame always ends with indices consistent with the
    /// relationship set.
    ///
    /// # Errors
    ///
    /// A routine or flush error aborts the frame; pending commands of the
    /// failing phase are dropped. Earlier phases' flushed mutations remain.
    pub fn run_frame(&mut self, world: &mut World, delta: f64) -> Result<FrameReport> {
        self.frame += 1;
        let mut routines_run = 0;
        let mut commands_applied = 0;

        for phase in Phase::ALL {
            let order = self.schedule.phase_order(phase).to_vec();
            let mut commands = CommandBuffer::new();
            for index in order {
                let mut ctx = FrameContext::new(world, &mut commands, delta, self.frame);
                self.registry.routine_mut(index).run(&mut ctx)?;
                routines_run += 1;
            }
            commands_applied += commands.flush(world)?;
        }
        world.rebuild_indices();

        tracing::trace!(
            frame = self.frame,
            routines_run,
            commands_applied,
            "frame complete"
        );
        Ok(FrameReport {
            frame: self.frame,
            routines_run,
            commands_applied,
        })
    }
}

//! Phase classification, routine scheduling, and frame execution for Orrery.
//!
//! This crate provides:
//! - [`AccessDeclaration`] / [`classify`] - Declared component access and the
//!   pure phase classification table
//! - [`OrderingConstraint`] - Before/after edges between routines
//! - [`RoutineRegistry`] / [`Schedule`] - Registration, stable topological
//!   ordering, cycle detection, and write-conflict analysis
//! - [`CommandBuffer`] - Deferred structural mutations, flushed at phase
//!   boundaries
//! - [`FrameExecutor`] - The per-frame phase pipeline, with participant-index
//!   maintenance as its fixed epilogue
//! - [`DependencyGc`] - Fixed-point cascade collection of broken dependencies

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod access;
mod command;
mod config;
mod constraint;
mod executor;
mod gc;
mod routine;
mod schedule;

pub use access::{AccessDeclaration, AccessMode, AccessViolation, Phase, classify};
pub use command::{Command, CommandBuffer};
pub use config::{ConflictPolicy, EngineConfig};
pub use constraint::{ConstraintKind, OrderingConstraint};
pub use executor::{FrameExecutor, FrameReport};
pub use gc::{DependencyGc, GC_ROUTINE_NAME, GcPlan};
pub use routine::{FnRoutine, FrameContext, Routine};
pub use schedule::{RoutineRegistry, Schedule, ScheduleWarning};

//! Dependency-cascade garbage collection.
//!
//! A relationship entity whose participants are not all alive is broken and
//! must die. A `Dependence` relationship carries an extra obligation: when its
//! dependency side breaks, the dependent entity dies too, which can break
//! further relationships in turn. The collector sweeps to a fixed point over
//! the live relationship set, then queues one deferred destroy per doomed
//! entity, so every cascade settles within the frame it started in.

use std::collections::BTreeSet;

use orrery_foundation::{EntityId, Error, KeywordId, Result};
use orrery_storage::World;

use crate::access::AccessDeclaration;
use crate::routine::{FrameContext, Routine};

/// Registration name of the built-in collector routine.
pub const GC_ROUTINE_NAME: &str = "dependency-gc";

/// The outcome of one collection sweep to fixed point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GcPlan {
    /// Entities to destroy, in ascending identifier order.
    pub doomed: Vec<EntityId>,
    /// Total passes taken, including the final confirming pass.
    pub passes: usize,
}

/// The built-in collector routine.
///
/// Registered automatically by the executor under [`GC_ROUTINE_NAME`]; its
/// declaration (destroys entities, reads relationship identities) places it
/// in the reactive structural phase, after ordinary structural changes.
#[derive(Clone, Copy, Debug)]
pub struct DependencyGc {
    max_passes: usize,
}

impl DependencyGc {
    /// Creates a collector with an upper bound on growing passes.
    #[must_use]
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// The collector's access declaration.
    #[must_use]
    pub fn declaration() -> AccessDeclaration {
        AccessDeclaration::new()
            .destroy_entities()
            .read_relationship_entities(KeywordId::DEPENDENCE)
    }

    /// Computes the doomed set without mutating the world.
    ///
    /// Each pass scans every live relationship. One with a dead or
    /// already-doomed participant is doomed; a `Dependence` whose dependency
    /// side broke additionally dooms its dependents. Passes repeat until a
    /// scan adds nothing.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the number of growing passes exceeds
    /// `max_passes`; the doomed set grows monotonically over a finite entity
    /// set, so this indicates a logic error, not a large cascade.
    pub fn collect(world: &World, max_passes: usize) -> Result<GcPlan> {
        let mut doomed: BTreeSet<EntityId> = BTreeSet::new();
        let mut passes = 0;
        loop {
            let before = doomed.len();
            for (relationship, record) in world.all_relationships() {
                let broken = record
                    .all_participants()
                    .any(|p| !world.is_alive(p) || doomed.contains(&p));
                if !broken {
                    continue;
                }
                doomed.insert(relationship);
                if record.kind == KeywordId::DEPENDENCE {
                    let dependency_broken = record
                        .participants(KeywordId::ROLE_DEPENDENCY)
                        .iter()
                        .any(|p| !world.is_alive(*p) || doomed.contains(p));
                    if dependency_broken {
                        for &dependent in record.participants(KeywordId::ROLE_DEPENDENT) {
                            if world.is_alive(dependent) {
                                doomed.insert(dependent);
                            }
                        }
                    }
                }
            }
            passes += 1;
            if doomed.len() == before {
                break;
            }
            if passes > max_passes {
                return Err(Error::internal(format!(
                    "dependency gc still growing after {max_passes} passes"
                )));
            }
        }
        Ok(GcPlan {
            doomed: doomed.into_iter().collect(),
            passes,
        })
    }
}

impl Routine for DependencyGc {
    fn run(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        let plan = DependencyGc::collect(ctx.world, self.max_passes)?;
        if !plan.doomed.is_empty() {
            tracing::debug!(
                doomed = plan.doomed.len(),
                passes = plan.passes,
                "dependency gc queued destroys"
            );
        }
        for &entity in &plan.doomed {
            ctx.destroy_entity(entity);
        }
        Ok(())
    }
}

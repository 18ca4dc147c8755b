//! Routine registration and schedule construction.
//!
//! Routines register once with a name, an access declaration, and ordering
//! constraints. Schedule construction classifies each routine into its phase,
//! builds one dependency graph per phase, and resolves it with a stable
//! topological sort: ties between unordered routines break by registration
//! order, so the plan is reproducible for identical registration input.
//! Cycles and illegal declarations fail construction with the offending
//! routines enumerated; same-phase write conflicts between unordered
//! routines are advisory by default.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use orrery_foundation::{Error, ErrorKind, KeywordId, Result};

use crate::access::{AccessDeclaration, Phase, classify};
use crate::config::{ConflictPolicy, EngineConfig};
use crate::constraint::{ConstraintKind, OrderingConstraint};
use crate::routine::Routine;

/// One registered routine.
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) declaration: AccessDeclaration,
    pub(crate) phase: Phase,
    pub(crate) constraints: Vec<OrderingConstraint>,
}

/// Holds registered routines in declaration order.
#[derive(Default)]
pub struct RoutineRegistry {
    entries: Vec<Entry>,
    routines: Vec<Box<dyn Routine>>,
    by_name: HashMap<String, usize>,
}

impl RoutineRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a routine under a unique name.
    ///
    /// The phase is derived from the declaration here, once; an illegal
    /// access combination is rejected immediately with the routine named.
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate name or an illegal access
    /// combination.
    pub fn register(
        &mut self,
        name: &str,
        declaration: AccessDeclaration,
        constraints: Vec<OrderingConstraint>,
        routine: Box<dyn Routine>,
    ) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(Error::new(ErrorKind::DuplicateRoutine(name.to_string())));
        }
        let phase =
            classify(&declaration).map_err(|v| Error::illegal_access(name, v.to_string()))?;
        self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry {
            name: name.to_string(),
            declaration,
            phase,
            constraints,
        });
        self.routines.push(routine);
        Ok(())
    }

    /// Number of registered routines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a routine with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The name of the routine at a registration index.
    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        &self.entries[index].name
    }

    /// The derived phase of the routine at a registration index.
    #[must_use]
    pub fn phase(&self, index: usize) -> Phase {
        self.entries[index].phase
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn routine_mut(&mut self, index: usize) -> &mut dyn Routine {
        self.routines[index].as_mut()
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Rolls back to the first `len` registrations. Used when a late batch
    /// fails schedule construction.
    pub(crate) fn truncate(&mut self, len: usize) {
        while self.entries.len() > len {
            let entry = self.entries.pop().expect("len checked above");
            self.by_name.remove(&entry.name);
            self.routines.pop();
        }
    }
}

/// Advisory findings from schedule construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleWarning {
    /// Two unordered routines in one phase write the same component.
    WriteConflict {
        /// The contested component type.
        component: KeywordId,
        /// First writer, in registration order.
        first: String,
        /// Second writer, in registration order.
        second: String,
    },
    /// A constraint crosses phases; phase order already decides the pair.
    CrossPhaseConstraint {
        /// The routine that declared the constraint.
        declared_by: String,
        /// The routine in the other phase.
        other: String,
    },
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteConflict {
                component,
                first,
                second,
            } => write!(
                f,
                "routines `{first}` and `{second}` both write {component:?} \
                 with no ordering constraint between them"
            ),
            Self::CrossPhaseConstraint { declared_by, other } => write!(
                f,
                "routine `{declared_by}` orders against `{other}` in a \
                 different phase; phase order already applies"
            ),
        }
    }
}

/// The computed per-frame execution plan.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    order: [Vec<usize>; 4],
    warnings: Vec<ScheduleWarning>,
}

impl Schedule {
    /// Builds the execution plan for a registry.
    ///
    /// # Errors
    ///
    /// Returns an error for a constraint naming an unregistered routine, a
    /// cyclic phase graph (with the participating routines enumerated), or —
    /// under [`ConflictPolicy::Reject`] — an unordered write conflict.
    pub fn build(registry: &RoutineRegistry, config: &EngineConfig) -> Result<Self> {
        let entries = registry.entries();
        let n = entries.len();

        // Resolve constraints into same-phase edges, successor sets per node.
        let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        let mut warnings = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            for constraint in &entry.constraints {
                if constraint.kind == ConstraintKind::Indifferent {
                    continue;
                }
                let Some(j) = registry.lookup(&constraint.other) else {
                    return Err(Error::new(ErrorKind::UnknownRoutine {
                        routine: constraint.other.clone(),
                        referenced_by: entry.name.clone(),
                    }));
                };
                if entries[j].phase != entry.phase {
                    warnings.push(ScheduleWarning::CrossPhaseConstraint {
                        declared_by: entry.name.clone(),
                        other: constraint.other.clone(),
                    });
                    continue;
                }
                match constraint.kind {
                    ConstraintKind::Before => successors[i].insert(j),
                    ConstraintKind::After => successors[j].insert(i),
                    ConstraintKind::Indifferent => unreachable!("skipped above"),
                };
            }
        }

        let mut order: [Vec<usize>; 4] = Default::default();
        for phase in Phase::ALL {
            let nodes: Vec<usize> = (0..n).filter(|&i| entries[i].phase == phase).collect();
            let sorted = Self::topo_sort(&nodes, &successors).map_err(|leftover| {
                let names = leftover.iter().map(|&i| entries[i].name.clone()).collect();
                Error::ordering_cycle(phase.name(), names)
            })?;
            Self::check_write_conflicts(
                &sorted,
                &successors,
                entries,
                config.conflict_policy,
                &mut warnings,
            )?;
            order[phase.index()] = sorted;
        }

        for warning in &warnings {
            tracing::warn!(%warning, "schedule advisory");
        }
        Ok(Self { order, warnings })
    }

    /// Stable Kahn topological sort: the ready set is ordered by
    /// registration index, so unordered routines keep declaration order.
    ///
    /// On a cycle, returns the unplaceable nodes (every cycle member is
    /// among them, since a cycle member's in-degree never reaches zero).
    fn topo_sort(
        nodes: &[usize],
        successors: &[BTreeSet<usize>],
    ) -> std::result::Result<Vec<usize>, Vec<usize>> {
        let node_set: BTreeSet<usize> = nodes.iter().copied().collect();
        let mut indegree: BTreeMap<usize, usize> = nodes.iter().map(|&i| (i, 0)).collect();
        for &i in nodes {
            for &j in &successors[i] {
                if node_set.contains(&j) {
                    *indegree.get_mut(&j).expect("node present") += 1;
                }
            }
        }

        let mut ready: BTreeSet<usize> = indegree
            .iter()
            .filter(|&(_, &d)| d == 0)
            .map(|(&i, _)| i)
            .collect();
        let mut sorted = Vec::with_capacity(nodes.len());
        while let Some(&i) = ready.first() {
            ready.remove(&i);
            sorted.push(i);
            for &j in &successors[i] {
                if let Some(d) = indegree.get_mut(&j) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(j);
                    }
                }
            }
        }

        if sorted.len() == nodes.len() {
            Ok(sorted)
        } else {
            let placed: BTreeSet<usize> = sorted.into_iter().collect();
            Err(nodes.iter().copied().filter(|i| !placed.contains(i)).collect())
        }
    }

    /// Flags unordered same-phase writers of one component. Advisory under
    /// `Warn` (ordering, not locking, resolves conflicts in a sequential
    /// pipeline); fatal under `Reject`.
    fn check_write_conflicts(
        nodes: &[usize],
        successors: &[BTreeSet<usize>],
        entries: &[Entry],
        policy: ConflictPolicy,
        warnings: &mut Vec<ScheduleWarning>,
    ) -> Result<()> {
        let mut writers: BTreeMap<KeywordId, Vec<usize>> = BTreeMap::new();
        for &i in nodes {
            for component in entries[i].declaration.written_components() {
                writers.entry(component).or_default().push(i);
            }
        }

        for (component, ws) in &writers {
            for (a_pos, &a) in ws.iter().enumerate() {
                for &b in &ws[a_pos + 1..] {
                    if a == b || Self::reaches(a, b, successors) || Self::reaches(b, a, successors)
                    {
                        continue;
                    }
                    let (first, second) = if a < b { (a, b) } else { (b, a) };
                    match policy {
                        ConflictPolicy::Reject => {
                            return Err(Error::new(ErrorKind::WriteConflict {
                                component: *component,
                                first: entries[first].name.clone(),
                                second: entries[second].name.clone(),
                            }));
                        }
                        ConflictPolicy::Warn => warnings.push(ScheduleWarning::WriteConflict {
                            component: *component,
                            first: entries[first].name.clone(),
                            second: entries[second].name.clone(),
                        }),
                    }
                }
            }
        }
        Ok(())
    }

    /// Depth-first reachability over constraint edges.
    fn reaches(from: usize, to: usize, successors: &[BTreeSet<usize>]) -> bool {
        let mut stack: Vec<usize> = successors[from].iter().copied().collect();
        let mut seen: BTreeSet<usize> = stack.iter().copied().collect();
        while let Some(i) = stack.pop() {
            if i == to {
                return true;
            }
            for &j in &successors[i] {
                if seen.insert(j) {
                    stack.push(j);
                }
            }
        }
        false
    }

    /// The execution order for one phase, as registration indices.
    #[must_use]
    pub fn phase_order(&self, phase: Phase) -> &[usize] {
        &self.order[phase.index()]
    }

    /// Advisory findings collected during construction.
    #[must_use]
    pub fn warnings(&self) -> &[ScheduleWarning] {
        &self.warnings
    }
}

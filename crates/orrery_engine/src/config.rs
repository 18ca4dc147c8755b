//! Engine configuration.

/// Policy for same-phase write conflicts between unordered routines.
///
/// The relaxed default matches the pipeline's single-threaded model: ordering,
/// not locking, resolves conflicts, so an undeclared ordering between two
/// writers is order-dependent but not unsafe. `Reject` turns the advisory
/// into a registration failure for hosts that want the stricter contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Flag the conflict at warning level and keep the schedule.
    #[default]
    Warn,
    /// Fail schedule construction with the offending pair.
    Reject,
}

/// Configuration for schedule construction and frame execution.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// How to treat unordered same-phase writers of one component.
    pub conflict_policy: ConflictPolicy,
    /// Upper bound on dependency-GC passes per frame. The collector always
    /// terminates on its own (the entity set is finite and strictly
    /// shrinking); exceeding this bound indicates a core logic error.
    pub max_gc_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::default(),
            max_gc_passes: 10_000,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the write-conflict policy.
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Sets the dependency-GC pass bound.
    #[must_use]
    pub fn with_max_gc_passes(mut self, passes: usize) -> Self {
        self.max_gc_passes = passes;
        self
    }
}

//! Error types for the Orrery core.
//!
//! Uses `thiserror` for ergonomic error definition. Registration-time errors
//! (illegal access combinations, ordering cycles, malformed schemas) are
//! fatal and enumerate the offending items; runtime lookups surface stale or
//! missing handles so callers can treat them as recoverable.

use thiserror::Error;

use crate::entity::EntityId;
use crate::intern::KeywordId;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Orrery operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an entity-not-found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates an unknown-component error.
    #[must_use]
    pub fn unknown_component(component: KeywordId) -> Self {
        Self::new(ErrorKind::UnknownComponent(component))
    }

    /// Creates an unknown-relationship-kind error.
    #[must_use]
    pub fn unknown_relationship(kind: KeywordId) -> Self {
        Self::new(ErrorKind::UnknownRelationship(kind))
    }

    /// Creates an unknown-role error.
    #[must_use]
    pub fn unknown_role(relationship: KeywordId, role: KeywordId) -> Self {
        Self::new(ErrorKind::UnknownRole { relationship, role })
    }

    /// Creates an illegal access combination error.
    #[must_use]
    pub fn illegal_access(routine: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalAccess {
            routine: routine.into(),
            detail: detail.into(),
        })
    }

    /// Creates an ordering-cycle error for a phase.
    #[must_use]
    pub fn ordering_cycle(phase: impl Into<String>, routines: Vec<String>) -> Self {
        Self::new(ErrorKind::OrderingCycle {
            phase: phase.into(),
            routines,
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity was not found in storage.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity reference is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Component type was never registered.
    #[error("unknown component: {0:?}")]
    UnknownComponent(KeywordId),

    /// Component type is already registered.
    #[error("component already registered: {0:?}")]
    DuplicateComponent(KeywordId),

    /// Relationship kind was never registered.
    #[error("unknown relationship kind: {0:?}")]
    UnknownRelationship(KeywordId),

    /// Relationship kind is already registered.
    #[error("relationship kind already registered: {0:?}")]
    DuplicateRelationship(KeywordId),

    /// A slot assignment referenced a role the schema does not declare.
    #[error("unknown role {role:?} for relationship {relationship:?}")]
    UnknownRole {
        /// The relationship kind that was addressed.
        relationship: KeywordId,
        /// The role name that is not part of the schema.
        role: KeywordId,
    },

    /// A slot assignment violated the declared slot cardinality.
    #[error(
        "slot arity violation for role {role:?} of {relationship:?}: \
         expected {expected}, got {actual}"
    )]
    SlotArity {
        /// The relationship kind that was addressed.
        relationship: KeywordId,
        /// The role whose slot was misfilled.
        role: KeywordId,
        /// Human-readable expected arity.
        expected: &'static str,
        /// Number of participants actually supplied.
        actual: usize,
    },

    /// A routine declared an illegal access combination.
    #[error("illegal access combination for routine `{routine}`: {detail}")]
    IllegalAccess {
        /// The routine that was rejected.
        routine: String,
        /// Which markers conflicted.
        detail: String,
    },

    /// A routine name is already registered.
    #[error("routine already registered: `{0}`")]
    DuplicateRoutine(String),

    /// An ordering constraint referenced a routine that does not exist.
    #[error("routine `{referenced_by}` orders against unknown routine `{routine}`")]
    UnknownRoutine {
        /// The routine named by the constraint.
        routine: String,
        /// The routine that declared the constraint.
        referenced_by: String,
    },

    /// The ordering constraints of a phase form a cycle.
    #[error("ordering cycle among routines in phase {phase}: {routines:?}")]
    OrderingCycle {
        /// The phase whose graph is cyclic.
        phase: String,
        /// Every routine participating in a cycle.
        routines: Vec<String>,
    },

    /// Two unordered routines write the same component (reject policy only).
    #[error(
        "routines `{first}` and `{second}` both write {component:?} \
         with no ordering constraint between them"
    )]
    WriteConflict {
        /// The contested component type.
        component: KeywordId,
        /// First writer, in registration order.
        first: String,
        /// Second writer, in registration order.
        second: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

//! Ordering constraints between routines.
//!
//! Constraints are declared at registration and reference peer routines by
//! name. `Indifferent` is the implicit default for every undeclared pair;
//! declaring it explicitly is allowed and changes nothing.

/// Direction of an ordering constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// The declaring routine runs before the named one.
    Before,
    /// The declaring routine runs after the named one.
    After,
    /// No ordering requirement; documentation only.
    Indifferent,
}

/// An ordering constraint declared by one routine against another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderingConstraint {
    /// Direction relative to the declaring routine.
    pub kind: ConstraintKind,
    /// Name of the peer routine.
    pub other: String,
}

impl OrderingConstraint {
    /// Declares "run before `other`".
    #[must_use]
    pub fn before(other: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Before,
            other: other.into(),
        }
    }

    /// Declares "run after `other`".
    #[must_use]
    pub fn after(other: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::After,
            other: other.into(),
        }
    }

    /// Declares explicit indifference toward `other`.
    #[must_use]
    pub fn indifferent(other: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Indifferent,
            other: other.into(),
        }
    }
}

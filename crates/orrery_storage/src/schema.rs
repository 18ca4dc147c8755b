//! Schema definitions for relationship kinds.
//!
//! A relationship kind declares a fixed set of named role slots. Each slot is
//! single- or multi-valued within one relationship instance, and each role is
//! exclusive or not from the participant's point of view: an exclusive role
//! means a participant appears in at most one relationship of this kind in
//! that role, so its cached index holds a single reference rather than a
//! multiset.

use orrery_foundation::KeywordId;

/// How many participants one relationship instance holds in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotCardinality {
    /// Exactly one participant.
    Single,
    /// One or more participants.
    Multiple,
}

/// Schema for one role slot of a relationship kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleSchema {
    /// Role name (e.g. `:parent`, `:child`).
    pub name: KeywordId,
    /// Slot cardinality within one relationship instance.
    pub slot: SlotCardinality,
    /// Whether a participant can hold this role in at most one relationship
    /// of this kind. Shapes the participant index: exclusive roles cache a
    /// single reference, non-exclusive roles cache a multiset.
    pub exclusive: bool,
}

impl RoleSchema {
    /// Creates an exclusive single-participant role.
    #[must_use]
    pub fn exclusive(name: KeywordId) -> Self {
        Self {
            name,
            slot: SlotCardinality::Single,
            exclusive: true,
        }
    }

    /// Creates a non-exclusive single-participant role.
    #[must_use]
    pub fn shared(name: KeywordId) -> Self {
        Self {
            name,
            slot: SlotCardinality::Single,
            exclusive: false,
        }
    }

    /// Sets the slot cardinality.
    #[must_use]
    pub fn with_slot(mut self, slot: SlotCardinality) -> Self {
        self.slot = slot;
        self
    }
}

/// Schema for a relationship kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipSchema {
    /// Kind name (e.g. `:anchorage`, `:dep/dependence`).
    pub kind: KeywordId,
    /// Declared role slots, in declaration order.
    pub roles: Vec<RoleSchema>,
}

impl RelationshipSchema {
    /// Creates a schema with no roles; add them with [`Self::with_role`].
    #[must_use]
    pub fn new(kind: KeywordId) -> Self {
        Self {
            kind,
            roles: Vec::new(),
        }
    }

    /// Adds a role slot.
    #[must_use]
    pub fn with_role(mut self, role: RoleSchema) -> Self {
        self.roles.push(role);
        self
    }

    /// Looks up a role by name.
    #[must_use]
    pub fn role(&self, name: KeywordId) -> Option<&RoleSchema> {
        self.roles.iter().find(|r| r.name == name)
    }

    /// The built-in dependence schema: two exclusive roles expressing
    /// "dependent requires dependency to remain alive".
    #[must_use]
    pub fn dependence() -> Self {
        Self::new(KeywordId::DEPENDENCE)
            .with_role(RoleSchema::exclusive(KeywordId::ROLE_DEPENDENT))
            .with_role(RoleSchema::exclusive(KeywordId::ROLE_DEPENDENCY))
    }
}

//! Cached participant indices.
//!
//! A participant index is an opt-in cache on a participant entity recording
//! which relationships currently include it in a given role. Exclusive roles
//! cache a single reference, non-exclusive roles a multiset. The cache is
//! rebuilt wholesale by the maintenance pass each frame — never patched
//! incrementally — so it can only lag the canonical relationship set by one
//! maintenance cycle. Entities that never attach an index are simply not
//! tracked; writes and reads for them are no-ops.

use std::collections::HashMap;

use orrery_foundation::{EntityId, KeywordId};

/// One cached view: the relationships including a participant in one role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexEntry {
    /// Exclusive role: at most one relationship.
    Single(Option<EntityId>),
    /// Non-exclusive role: all relationships, in insertion (rebuild) order.
    Multiple(Vec<EntityId>),
}

impl IndexEntry {
    /// Returns the single cached reference, if any.
    ///
    /// For a `Multiple` entry this is the first reference.
    #[must_use]
    pub fn single(&self) -> Option<EntityId> {
        match self {
            Self::Single(r) => *r,
            Self::Multiple(v) => v.first().copied(),
        }
    }

    /// Returns the cached references as a slice-like vector.
    #[must_use]
    pub fn all(&self) -> Vec<EntityId> {
        match self {
            Self::Single(None) => Vec::new(),
            Self::Single(Some(r)) => vec![*r],
            Self::Multiple(v) => v.clone(),
        }
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(r) => r.is_none(),
            Self::Multiple(v) => v.is_empty(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Single(r) => *r = None,
            Self::Multiple(v) => v.clear(),
        }
    }

    fn insert(&mut self, relationship: EntityId) {
        match self {
            Self::Single(r) => *r = Some(relationship),
            Self::Multiple(v) => v.push(relationship),
        }
    }
}

/// Storage for participant index entries, keyed by participant, kind, role.
#[derive(Clone, Debug, Default)]
pub struct ParticipantIndexStore {
    entries: HashMap<(EntityId, KeywordId, KeywordId), IndexEntry>,
}

impl ParticipantIndexStore {
    /// Creates a new empty index store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an index to a participant for `(kind, role)`.
    ///
    /// `exclusive` shapes the entry: single reference versus multiset.
    /// Attaching twice resets the entry to empty.
    pub fn attach(&mut self, entity: EntityId, kind: KeywordId, role: KeywordId, exclusive: bool) {
        let entry = if exclusive {
            IndexEntry::Single(None)
        } else {
            IndexEntry::Multiple(Vec::new())
        };
        self.entries.insert((entity, kind, role), entry);
    }

    /// Detaches an index from a participant. Detaching an absent index is a
    /// no-op.
    pub fn detach(&mut self, entity: EntityId, kind: KeywordId, role: KeywordId) {
        self.entries.remove(&(entity, kind, role));
    }

    /// Reads a participant's cached view, if it carries the index.
    #[must_use]
    pub fn get(&self, entity: EntityId, kind: KeywordId, role: KeywordId) -> Option<&IndexEntry> {
        self.entries.get(&(entity, kind, role))
    }

    /// Clears every entry, preserving attachments. First step of a rebuild.
    pub fn clear_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.clear();
        }
    }

    /// Records that `relationship` includes `entity` in `(kind, role)`.
    ///
    /// Participants without the index are silently skipped — they are not
    /// required to track inbound relationships.
    pub fn record(
        &mut self,
        entity: EntityId,
        kind: KeywordId,
        role: KeywordId,
        relationship: EntityId,
    ) {
        if let Some(entry) = self.entries.get_mut(&(entity, kind, role)) {
            entry.insert(relationship);
        }
    }

    /// Removes every index attached to an entity (on destruction).
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.entries.retain(|(e, _, _), _| *e != entity);
    }
}

//! Relationship records: typed associations stored as first-class entities.
//!
//! A relationship is an entity whose payload is a fixed tuple of role slots,
//! each holding one or more participant entities. Auxiliary data about the
//! association belongs in ordinary components on the relationship entity,
//! never inside the slot tuple.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use orrery_foundation::{EntityId, Error, ErrorKind, KeywordId, Result};

use crate::schema::{RelationshipSchema, SlotCardinality};

/// One filled role slot: a role name and its participants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotAssignment {
    /// The role this slot fills.
    pub role: KeywordId,
    /// Participants holding the role. Single-cardinality slots hold exactly
    /// one entry.
    pub participants: Vec<EntityId>,
}

impl SlotAssignment {
    /// Creates a single-participant assignment.
    #[must_use]
    pub fn single(role: KeywordId, participant: EntityId) -> Self {
        Self {
            role,
            participants: vec![participant],
        }
    }

    /// Creates a multi-participant assignment.
    #[must_use]
    pub fn many(role: KeywordId, participants: Vec<EntityId>) -> Self {
        Self { role, participants }
    }
}

/// The payload of one relationship entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipRecord {
    /// The relationship kind.
    pub kind: KeywordId,
    /// Filled slots, in schema declaration order.
    pub slots: Vec<SlotAssignment>,
}

impl RelationshipRecord {
    /// Returns the participants filling a role.
    #[must_use]
    pub fn participants(&self, role: KeywordId) -> &[EntityId] {
        self.slots
            .iter()
            .find(|s| s.role == role)
            .map_or(&[], |s| s.participants.as_slice())
    }

    /// Returns the sole participant of a single-cardinality role.
    #[must_use]
    pub fn participant(&self, role: KeywordId) -> Option<EntityId> {
        self.participants(role).first().copied()
    }

    /// Iterates every participant across all slots.
    pub fn all_participants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().flat_map(|s| s.participants.iter().copied())
    }
}

/// Stores relationship schemas and the live relationship records.
///
/// Records are indexed by kind with deterministic (entity-ordered) iteration,
/// so every pass over "all relationships of kind K" is reproducible.
#[derive(Clone, Debug, Default)]
pub struct RelationshipStore {
    /// Registered schemas, ordered by kind for deterministic kind iteration.
    schemas: BTreeMap<KeywordId, RelationshipSchema>,
    /// Record payload per relationship entity.
    records: HashMap<EntityId, RelationshipRecord>,
    /// Live relationship entities per kind, in entity order.
    by_kind: BTreeMap<KeywordId, BTreeSet<EntityId>>,
}

impl RelationshipStore {
    /// Creates a new empty relationship store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a relationship schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is already registered.
    pub fn register_schema(&mut self, schema: RelationshipSchema) -> Result<()> {
        if self.schemas.contains_key(&schema.kind) {
            return Err(Error::new(ErrorKind::DuplicateRelationship(schema.kind)));
        }
        self.by_kind.insert(schema.kind, BTreeSet::new());
        self.schemas.insert(schema.kind, schema);
        Ok(())
    }

    /// Gets the schema for a relationship kind.
    #[must_use]
    pub fn schema(&self, kind: KeywordId) -> Option<&RelationshipSchema> {
        self.schemas.get(&kind)
    }

    /// Iterates registered kinds in deterministic order.
    pub fn kinds(&self) -> impl Iterator<Item = KeywordId> + '_ {
        self.schemas.keys().copied()
    }

    /// Validates slot assignments against a schema and normalizes them into
    /// schema declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown kind, an assignment naming a role the
    /// schema does not declare, or a slot arity violation (a single slot with
    /// anything but one participant, a multiple slot left empty).
    pub fn validate_slots(
        &self,
        kind: KeywordId,
        assignments: &[SlotAssignment],
    ) -> Result<Vec<SlotAssignment>> {
        let schema = self
            .schemas
            .get(&kind)
            .ok_or_else(|| Error::unknown_relationship(kind))?;

        for assignment in assignments {
            if schema.role(assignment.role).is_none() {
                return Err(Error::unknown_role(kind, assignment.role));
            }
        }

        let mut normalized = Vec::with_capacity(schema.roles.len());
        for role in &schema.roles {
            let supplied: Vec<EntityId> = assignments
                .iter()
                .filter(|a| a.role == role.name)
                .flat_map(|a| a.participants.iter().copied())
                .collect();
            let (expected, ok) = match role.slot {
                SlotCardinality::Single => ("exactly one participant", supplied.len() == 1),
                SlotCardinality::Multiple => ("at least one participant", !supplied.is_empty()),
            };
            if !ok {
                return Err(Error::new(ErrorKind::SlotArity {
                    relationship: kind,
                    role: role.name,
                    expected,
                    actual: supplied.len(),
                }));
            }
            normalized.push(SlotAssignment::many(role.name, supplied));
        }
        Ok(normalized)
    }

    /// Attaches a validated relationship record to an entity.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::validate_slots`] failures.
    pub fn insert(
        &mut self,
        entity: EntityId,
        kind: KeywordId,
        assignments: &[SlotAssignment],
    ) -> Result<()> {
        let slots = self.validate_slots(kind, assignments)?;
        self.records.insert(entity, RelationshipRecord { kind, slots });
        self.by_kind.entry(kind).or_default().insert(entity);
        Ok(())
    }

    /// Removes a relationship record. Removing a non-relationship entity is a
    /// no-op returning `None`.
    pub fn remove(&mut self, entity: EntityId) -> Option<RelationshipRecord> {
        let record = self.records.remove(&entity)?;
        if let Some(set) = self.by_kind.get_mut(&record.kind) {
            set.remove(&entity);
        }
        Some(record)
    }

    /// Gets the record carried by a relationship entity.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&RelationshipRecord> {
        self.records.get(&entity)
    }

    /// Returns true if the entity carries a relationship record.
    #[must_use]
    pub fn is_relationship(&self, entity: EntityId) -> bool {
        self.records.contains_key(&entity)
    }

    /// Iterates live relationships of one kind in entity order.
    ///
    /// The sequence is finite, restartable, and reflects state as of the last
    /// structural flush.
    pub fn of_kind(
        &self,
        kind: KeywordId,
    ) -> impl Iterator<Item = (EntityId, &RelationshipRecord)> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flat_map(|set| set.iter())
            .filter_map(|e| self.records.get(e).map(|r| (*e, r)))
    }

    /// Iterates every live relationship, kind-major then entity order.
    pub fn all(&self) -> impl Iterator<Item = (EntityId, &RelationshipRecord)> + '_ {
        self.by_kind
            .values()
            .flat_map(|set| set.iter())
            .filter_map(|e| self.records.get(e).map(|r| (*e, r)))
    }

    /// Number of live relationship records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no relationships are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

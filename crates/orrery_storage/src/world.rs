//! The mutable world facade.
//!
//! `World` ties together entity allocation, component values, relationship
//! records, and participant indices behind one interface. All mutation is
//! in-place and single-threaded; structural mutation discipline (buffering,
//! phase boundaries) is the scheduler's concern, not the world's.

use orrery_foundation::{EntityId, Error, Interner, KeywordId, Result, Value};

use crate::component::ComponentStore;
use crate::entity::EntityStore;
use crate::index::{IndexEntry, ParticipantIndexStore};
use crate::relationship::{RelationshipRecord, RelationshipStore, SlotAssignment};
use crate::schema::RelationshipSchema;

/// The unified simulation store.
///
/// Created worlds already know the built-in `Dependence` relationship kind.
#[derive(Clone, Debug)]
pub struct World {
    entities: EntityStore,
    components: ComponentStore,
    relationships: RelationshipStore,
    indices: ParticipantIndexStore,
    interner: Interner,
}

impl World {
    /// Creates an empty world with the `Dependence` schema pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut relationships = RelationshipStore::new();
        relationships
            .register_schema(RelationshipSchema::dependence())
            .unwrap_or_else(|_| unreachable!("fresh store cannot hold a duplicate schema"));
        Self {
            entities: EntityStore::new(),
            components: ComponentStore::new(),
            relationships,
            indices: ParticipantIndexStore::new(),
            interner: Interner::new(),
        }
    }

    /// Shared access to the interner.
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Mutable access to the interner.
    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Spawns a new live entity.
    pub fn spawn(&mut self) -> EntityId {
        self.entities.spawn()
    }

    /// Returns true if the handle refers to a live entity.
    #[must_use]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    /// Destroys an entity, dropping its components, indices, and — if it is
    /// a relationship entity — its relationship record.
    ///
    /// Relationships in which the entity merely participates are left in
    /// place; resolving those is the dependency collector's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale or never existed.
    pub fn destroy(&mut self, entity: EntityId) -> Result<()> {
        self.entities.destroy(entity)?;
        self.components.remove_entity(entity);
        self.indices.remove_entity(entity);
        self.relationships.remove(entity);
        Ok(())
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterates live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Registers a component type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is already registered.
    pub fn register_component(&mut self, component: KeywordId) -> Result<()> {
        self.components.register(component)
    }

    /// Sets a component value on a live entity.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead entity or an unregistered component.
    pub fn set(&mut self, entity: EntityId, component: KeywordId, value: Value) -> Result<()> {
        self.entities.validate(entity)?;
        self.components.set(entity, component, value)
    }

    /// Gets a component value.
    #[must_use]
    pub fn get(&self, entity: EntityId, component: KeywordId) -> Option<&Value> {
        self.components.get(entity, component)
    }

    /// Returns true if the entity carries the component.
    #[must_use]
    pub fn has(&self, entity: EntityId, component: KeywordId) -> bool {
        self.components.has(entity, component)
    }

    /// Removes a component from a live entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is dead.
    pub fn remove_component(&mut self, entity: EntityId, component: KeywordId) -> Result<()> {
        self.entities.validate(entity)?;
        self.components.remove(entity, component);
        Ok(())
    }

    /// Iterates `(entity, value)` pairs for a component type in entity order.
    #[must_use]
    pub fn components_of(&self, component: KeywordId) -> Vec<(EntityId, &Value)> {
        self.components.iter(component)
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Registers a relationship schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is already registered.
    pub fn register_relationship(&mut self, schema: RelationshipSchema) -> Result<()> {
        self.relationships.register_schema(schema)
    }

    /// Gets the schema for a relationship kind.
    #[must_use]
    pub fn relationship_schema(&self, kind: KeywordId) -> Option<&RelationshipSchema> {
        self.relationships.schema(kind)
    }

    /// Iterates registered relationship kinds in deterministic order.
    pub fn relationship_kinds(&self) -> impl Iterator<Item = KeywordId> + '_ {
        self.relationships.kinds()
    }

    /// Creates a relationship entity with the given slot assignments.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown kind, an unknown role, or a slot
    /// arity violation; the world is unchanged on error.
    pub fn create_relationship(
        &mut self,
        kind: KeywordId,
        assignments: &[SlotAssignment],
    ) -> Result<EntityId> {
        // Validate before allocating so a rejected create has no effect.
        self.relationships.validate_slots(kind, assignments)?;
        let entity = self.entities.spawn();
        self.relationships.insert(entity, kind, assignments)?;
        Ok(entity)
    }

    /// Validates slot assignments against a kind's schema without mutating
    /// anything. Used to reject malformed deferred creates at queue time.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown kind, an unknown role, or a slot
    /// arity violation.
    pub fn validate_relationship(
        &self,
        kind: KeywordId,
        assignments: &[SlotAssignment],
    ) -> Result<()> {
        self.relationships.validate_slots(kind, assignments).map(|_| ())
    }

    /// Attaches a relationship record to an already-allocated entity.
    ///
    /// Used by the command buffer, which reserves the entity eagerly and
    /// lands the record at flush time.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead entity or invalid slot assignments.
    pub fn insert_relationship(
        &mut self,
        entity: EntityId,
        kind: KeywordId,
        assignments: &[SlotAssignment],
    ) -> Result<()> {
        self.entities.validate(entity)?;
        self.relationships.insert(entity, kind, assignments)
    }

    /// Destroys a relationship entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity carries no relationship record or is
    /// dead.
    pub fn destroy_relationship(&mut self, entity: EntityId) -> Result<()> {
        if !self.relationships.is_relationship(entity) {
            return Err(Error::entity_not_found(entity));
        }
        self.destroy(entity)
    }

    /// Gets the record carried by a relationship entity.
    #[must_use]
    pub fn relationship(&self, entity: EntityId) -> Option<&RelationshipRecord> {
        self.relationships.get(entity)
    }

    /// Returns true if the entity carries a relationship record.
    #[must_use]
    pub fn is_relationship(&self, entity: EntityId) -> bool {
        self.relationships.is_relationship(entity)
    }

    /// Iterates live relationships of one kind in entity order.
    pub fn relationships_of(
        &self,
        kind: KeywordId,
    ) -> impl Iterator<Item = (EntityId, &RelationshipRecord)> + '_ {
        self.relationships.of_kind(kind)
    }

    /// Iterates every live relationship, kind-major then entity order.
    pub fn all_relationships(
        &self,
    ) -> impl Iterator<Item = (EntityId, &RelationshipRecord)> + '_ {
        self.relationships.all()
    }

    /// Number of live relationship records.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    // =========================================================================
    // Participant Indices
    // =========================================================================

    /// Attaches a participant index to a live entity for `(kind, role)`.
    ///
    /// The entry shape (single reference or multiset) follows the role's
    /// declared exclusivity.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead entity, unknown kind, or unknown role.
    pub fn attach_index(
        &mut self,
        entity: EntityId,
        kind: KeywordId,
        role: KeywordId,
    ) -> Result<()> {
        self.entities.validate(entity)?;
        let schema = self
            .relationships
            .schema(kind)
            .ok_or_else(|| Error::unknown_relationship(kind))?;
        let role_schema = schema
            .role(role)
            .ok_or_else(|| Error::unknown_role(kind, role))?;
        self.indices.attach(entity, kind, role, role_schema.exclusive);
        Ok(())
    }

    /// Detaches a participant index. Detaching an absent index is a no-op.
    pub fn detach_index(&mut self, entity: EntityId, kind: KeywordId, role: KeywordId) {
        self.indices.detach(entity, kind, role);
    }

    /// Reads a participant's cached view for `(kind, role)`.
    ///
    /// `None` means the entity does not track this role — absence, not error.
    #[must_use]
    pub fn participant_index(
        &self,
        entity: EntityId,
        kind: KeywordId,
        role: KeywordId,
    ) -> Option<&IndexEntry> {
        self.indices.get(entity, kind, role)
    }

    /// Rebuilds every participant index from the canonical relationship set:
    /// clear all entries, then replay every live relationship's slots into
    /// the participants that track them.
    pub fn rebuild_indices(&mut self) {
        self.indices.clear_all();
        for (rel, record) in self.relationships.all() {
            for slot in &record.slots {
                for participant in &slot.participants {
                    self.indices.record(*participant, record.kind, slot.role, rel);
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

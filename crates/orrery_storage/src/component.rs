//! Component value storage keyed by registered component type.
//!
//! Component types are interned keywords registered once; values are stored
//! per `(component, entity)` pair. The store does not interpret values —
//! mutation discipline lives in the scheduler's access declarations, not
//! here.

use std::collections::{HashMap, HashSet};

use orrery_foundation::{EntityId, Error, ErrorKind, KeywordId, Result, Value};

/// Stores component values for entities, keyed by component type.
#[derive(Clone, Debug, Default)]
pub struct ComponentStore {
    /// Registered component types.
    registered: HashSet<KeywordId>,
    /// Values per component type, per entity.
    values: HashMap<KeywordId, HashMap<EntityId, Value>>,
}

impl ComponentStore {
    /// Creates a new empty component store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is already registered.
    pub fn register(&mut self, component: KeywordId) -> Result<()> {
        if !self.registered.insert(component) {
            return Err(Error::new(ErrorKind::DuplicateComponent(component)));
        }
        Ok(())
    }

    /// Returns true if the component type is registered.
    #[must_use]
    pub fn is_registered(&self, component: KeywordId) -> bool {
        self.registered.contains(&component)
    }

    /// Sets a component value on an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the component type was never registered.
    pub fn set(&mut self, entity: EntityId, component: KeywordId, value: Value) -> Result<()> {
        if !self.registered.contains(&component) {
            return Err(Error::unknown_component(component));
        }
        self.values.entry(component).or_default().insert(entity, value);
        Ok(())
    }

    /// Gets a component value from an entity.
    #[must_use]
    pub fn get(&self, entity: EntityId, component: KeywordId) -> Option<&Value> {
        self.values.get(&component)?.get(&entity)
    }

    /// Returns true if the entity carries the component.
    #[must_use]
    pub fn has(&self, entity: EntityId, component: KeywordId) -> bool {
        self.get(entity, component).is_some()
    }

    /// Removes a component from an entity. Removing an absent component is a
    /// no-op.
    pub fn remove(&mut self, entity: EntityId, component: KeywordId) {
        if let Some(per_entity) = self.values.get_mut(&component) {
            per_entity.remove(&entity);
        }
    }

    /// Removes every component carried by an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        for per_entity in self.values.values_mut() {
            per_entity.remove(&entity);
        }
    }

    /// Iterates over `(entity, value)` pairs for a component type, in
    /// deterministic entity order.
    #[must_use]
    pub fn iter(&self, component: KeywordId) -> Vec<(EntityId, &Value)> {
        let mut pairs: Vec<_> = self
            .values
            .get(&component)
            .into_iter()
            .flat_map(|m| m.iter().map(|(e, v)| (*e, v)))
            .collect();
        pairs.sort_by_key(|(e, _)| *e);
        pairs
    }
}

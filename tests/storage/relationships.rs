//! Integration tests for relationship entities.
//!
//! Relationships are entities carrying a record that binds participants into
//! named role slots; this exercises schema registration, slot validation,
//! creation, destruction, and traversal.

use orrery_foundation::{ErrorKind, KeywordId, Value};
use orrery_storage::{RelationshipSchema, RoleSchema, SlotAssignment, SlotCardinality, World};

fn anchorage_world() -> (World, KeywordId, KeywordId, KeywordId) {
    let mut world = World::new();
    let anchorage = world.interner_mut().intern("anchorage");
    let role_ship = world.interner_mut().intern("anchorage/ship");
    let role_station = world.interner_mut().intern("anchorage/station");
    world
        .register_relationship(
            RelationshipSchema::new(anchorage)
                .with_role(RoleSchema::exclusive(role_ship))
                .with_role(RoleSchema::shared(role_station)),
        )
        .unwrap();
    (world, anchorage, role_ship, role_station)
}

// =============================================================================
// Schema Registration
// =============================================================================

#[test]
fn registered_schemas_are_queryable() {
    let (world, anchorage, role_ship, _) = anchorage_world();

    let schema = world.relationship_schema(anchorage).unwrap();
    assert_eq!(schema.roles.len(), 2);
    assert!(schema.role(role_ship).unwrap().exclusive);
}

#[test]
fn duplicate_kinds_are_rejected() {
    let (mut world, anchorage, _, _) = anchorage_world();

    let err = world
        .register_relationship(RelationshipSchema::new(anchorage))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateRelationship(_)));
}

#[test]
fn dependence_is_preregistered() {
    let world = World::new();
    let schema = world.relationship_schema(KeywordId::DEPENDENCE).unwrap();
    assert!(schema.role(KeywordId::ROLE_DEPENDENT).is_some());
    assert!(schema.role(KeywordId::ROLE_DEPENDENCY).is_some());
}

// =============================================================================
// Creation and Records
// =============================================================================

#[test]
fn a_relationship_is_itself_an_entity() {
    let (mut world, anchorage, role_ship, role_station) = anchorage_world();
    let ship = world.spawn();
    let station = world.spawn();

    let rel = world
        .create_relationship(
            anchorage,
            &[
                SlotAssignment::single(role_ship, ship),
                SlotAssignment::single(role_station, station),
            ],
        )
        .unwrap();

    assert!(world.is_alive(rel));
    assert!(world.is_relationship(rel));
    let record = world.relationship(rel).unwrap();
    assert_eq!(record.kind, anchorage);
    assert_eq!(record.participant(role_ship), Some(ship));
    assert_eq!(record.participant(role_station), Some(station));
}

#[test]
fn relationship_entities_can_carry_components() {
    let (mut world, anchorage, role_ship, role_station) = anchorage_world();
    let since = world.interner_mut().intern("docked-since");
    world.register_component(since).unwrap();
    let ship = world.spawn();
    let station = world.spawn();

    let rel = world
        .create_relationship(
            anchorage,
            &[
                SlotAssignment::single(role_ship, ship),
                SlotAssignment::single(role_station, station),
            ],
        )
        .unwrap();
    world.set(rel, since, Value::Int(1400)).unwrap();

    assert_eq!(world.get(rel, since), Some(&Value::Int(1400)));
}

#[test]
fn missing_roles_are_a_slot_arity_error() {
    let (mut world, anchorage, role_ship, _) = anchorage_world();
    let ship = world.spawn();

    let err = world
        .create_relationship(anchorage, &[SlotAssignment::single(role_ship, ship)])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SlotArity { .. }));
    // A rejected create leaves nothing behind.
    assert_eq!(world.entity_count(), 1);
}

#[test]
fn unknown_roles_are_rejected() {
    let (mut world, anchorage, role_ship, role_station) = anchorage_world();
    let bogus = world.interner_mut().intern("anchorage/tugboat");
    let ship = world.spawn();
    let station = world.spawn();

    let err = world
        .create_relationship(
            anchorage,
            &[
                SlotAssignment::single(role_ship, ship),
                SlotAssignment::single(role_station, station),
                SlotAssignment::single(bogus, ship),
            ],
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownRole { .. }));
}

#[test]
fn multi_slots_accept_many_participants() {
    let mut world = World::new();
    let convoy = world.interner_mut().intern("convoy");
    let role_leader = world.interner_mut().intern("convoy/leader");
    let role_member = world.interner_mut().intern("convoy/member");
    world
        .register_relationship(
            RelationshipSchema::new(convoy)
                .with_role(RoleSchema::shared(role_leader))
                .with_role(RoleSchema::shared(role_member).with_slot(SlotCardinality::Multiple)),
        )
        .unwrap();

    let leader = world.spawn();
    let members: Vec<_> = (0..3).map(|_| world.spawn()).collect();
    let rel = world
        .create_relationship(
            convoy,
            &[
                SlotAssignment::single(role_leader, leader),
                SlotAssignment::many(role_member, members.clone()),
            ],
        )
        .unwrap();

    let record = world.relationship(rel).unwrap();
    assert_eq!(record.participants(role_member), members.as_slice());
}

// =============================================================================
// Destruction and Traversal
// =============================================================================

#[test]
fn destroying_a_relationship_spares_its_participants() {
    let (mut world, anchorage, role_ship, role_station) = anchorage_world();
    let ship = world.spawn();
    let station = world.spawn();
    let rel = world
        .create_relationship(
            anchorage,
            &[
                SlotAssignment::single(role_ship, ship),
                SlotAssignment::single(role_station, station),
            ],
        )
        .unwrap();

    world.destroy_relationship(rel).unwrap();

    assert!(!world.is_alive(rel));
    assert!(world.is_alive(ship));
    assert!(world.is_alive(station));
    assert_eq!(world.relationship_count(), 0);
}

#[test]
fn relationships_of_a_kind_iterate_in_entity_order() {
    let (mut world, anchorage, role_ship, role_station) = anchorage_world();
    let station = world.spawn();

    let mut rels = Vec::new();
    for _ in 0..4 {
        let ship = world.spawn();
        rels.push(
            world
                .create_relationship(
                    anchorage,
                    &[
                        SlotAssignment::single(role_ship, ship),
                        SlotAssignment::single(role_station, station),
                    ],
                )
                .unwrap(),
        );
    }

    let seen: Vec<_> = world.relationships_of(anchorage).map(|(e, _)| e).collect();
    assert_eq!(seen, rels);
}

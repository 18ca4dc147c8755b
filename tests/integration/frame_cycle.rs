//! Full frame cycles: routines across phases, deferred mutations, and the
//! end-of-frame index rebuild.

use std::cell::RefCell;
use std::rc::Rc;

use orrery_engine::{
    AccessDeclaration, EngineConfig, FnRoutine, FrameContext, FrameExecutor, OrderingConstraint,
    RoutineRegistry,
};
use orrery_foundation::{KeywordId, Value};
use orrery_storage::{RelationshipSchema, RoleSchema, SlotAssignment, World};

// =============================================================================
// Phase Pipeline
// =============================================================================

#[test]
fn a_frame_runs_core_late_structural_reactive_in_order() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let tap = |log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str| {
        let log = Rc::clone(log);
        FnRoutine::boxed(move |_: &mut FrameContext<'_>| {
            log.borrow_mut().push(tag);
            Ok(())
        })
    };
    let pos = KeywordId::DEPENDENCE;

    let mut registry = RoutineRegistry::new();
    registry
        .register(
            "cleanup",
            AccessDeclaration::new().destroy_entities().read_relationship_entities(pos),
            vec![],
            tap(&log, "reactive"),
        )
        .unwrap();
    registry
        .register(
            "spawn",
            AccessDeclaration::new().create_entities(),
            vec![],
            tap(&log, "structural"),
        )
        .unwrap();
    registry
        .register("think", AccessDeclaration::new().read_curr(pos), vec![], tap(&log, "late"))
        .unwrap();
    registry
        .register("drift", AccessDeclaration::new().iterate(pos), vec![], tap(&log, "core"))
        .unwrap();

    let mut executor = FrameExecutor::new(registry, EngineConfig::new()).unwrap();
    let mut world = World::new();
    executor.run_frame(&mut world, 0.016).unwrap();
    executor.run_frame(&mut world, 0.016).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "core", "late", "structural", "reactive", //
            "core", "late", "structural", "reactive",
        ]
    );
}

#[test]
fn structural_creates_are_visible_to_the_next_frame() {
    let mut world = World::new();
    let hull = world.interner_mut().intern("hull");
    world.register_component(hull).unwrap();

    let counts: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let counts_in = Rc::clone(&counts);

    let mut registry = RoutineRegistry::new();
    registry
        .register(
            "census",
            AccessDeclaration::new().read_curr(hull),
            vec![],
            FnRoutine::boxed(move |ctx: &mut FrameContext<'_>| {
                counts_in.borrow_mut().push(ctx.world.components_of(hull).len());
                Ok(())
            }),
        )
        .unwrap();
    registry
        .register(
            "launch",
            AccessDeclaration::new().create_entities(),
            vec![],
            FnRoutine::boxed(move |ctx: &mut FrameContext<'_>| {
                ctx.create_entity(vec![(hull, Value::Int(100))]);
                Ok(())
            }),
        )
        .unwrap();

    let mut executor = FrameExecutor::new(registry, EngineConfig::new()).unwrap();
    executor.run_frame(&mut world, 0.016).unwrap();
    executor.run_frame(&mut world, 0.016).unwrap();
    executor.run_frame(&mut world, 0.016).unwrap();

    // The census (late) runs before the launch (structural) each frame, so
    // it sees the ships launched in all previous frames.
    assert_eq!(*counts.borrow(), vec![0, 1, 2]);
    assert_eq!(world.entity_count(), 3);
}

#[test]
fn same_phase_constraints_order_execution_not_just_the_plan() {
    let mut world = World::new();
    let score = world.interner_mut().intern("score");
    world.register_component(score).unwrap();
    let tally = world.spawn();
    world.set(tally, score, Value::Int(0)).unwrap();

    let bump = |factor: i64| {
        move |ctx: &mut FrameContext<'_>| {
            let current = ctx.world.get(tally, score).and_then(Value::as_int).unwrap();
            ctx.world.set(tally, score, Value::Int(current * 10 + factor))?;
            Ok(())
        }
    };

    let mut registry = RoutineRegistry::new();
    registry
        .register(
            "second",
            AccessDeclaration::new().read_curr(score).write(score),
            vec![OrderingConstraint::after("first")],
            FnRoutine::boxed(bump(2)),
        )
        .unwrap();
    registry
        .register(
            "first",
            AccessDeclaration::new().read_curr(score).write(score),
            vec![],
            FnRoutine::boxed(bump(1)),
        )
        .unwrap();

    let mut executor = FrameExecutor::new(registry, EngineConfig::new()).unwrap();
    executor.run_frame(&mut world, 0.016).unwrap();

    // first then second: 0 -> 1 -> 12.
    assert_eq!(world.get(tally, score), Some(&Value::Int(12)));
}

// =============================================================================
// Index Maintenance
// =============================================================================

#[test]
fn indices_track_relationship_churn_across_frames() {
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

    let ship = world.spawn();
    let station = world.spawn();
    world.attach_index(ship, anchorage, role_ship).unwrap();
    world.attach_index(station, anchorage, role_station).unwrap();

    let docked: Rc<RefCell<Option<orrery_foundation::EntityId>>> = Rc::new(RefCell::new(None));
    let docked_in = Rc::clone(&docked);

    let mut registry = RoutineRegistry::new();
    registry
        .register(
            "traffic-control",
            AccessDeclaration::new().create_entities(),
            vec![],
            FnRoutine::boxed(move |ctx: &mut FrameContext<'_>| {
                match ctx.frame {
                    // Frame 1: dock.
                    1 => {
                        let rel = ctx.create_relationship(
                            anchorage,
                            vec![
                                SlotAssignment::single(role_ship, ship),
                                SlotAssignment::single(role_station, station),
                            ],
                        )?;
                        *docked_in.borrow_mut() = Some(rel);
                    }
                    // Frame 2: undock.
                    2 => {
                        let rel = docked_in.borrow().unwrap();
                        ctx.destroy_relationship(rel);
                    }
                    _ => {}
                }
                Ok(())
            }),
        )
        .unwrap();

    let mut executor = FrameExecutor::new(registry, EngineConfig::new()).unwrap();

    executor.run_frame(&mut world, 0.016).unwrap();
    let rel = docked.borrow().unwrap();
    let entry = world.participant_index(ship, anchorage, role_ship).unwrap();
    assert_eq!(entry.single(), Some(rel));
    let entry = world.participant_index(station, anchorage, role_station).unwrap();
    assert_eq!(entry.all(), vec![rel]);

    executor.run_frame(&mut world, 0.016).unwrap();
    assert!(world.participant_index(ship, anchorage, role_ship).unwrap().is_empty());
    assert!(world.participant_index(station, anchorage, role_station).unwrap().is_empty());
}

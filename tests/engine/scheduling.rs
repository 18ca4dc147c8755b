//! Integration tests for routine registration and schedule construction.

use orrery_engine::{
    AccessDeclaration, ConflictPolicy, EngineConfig, FnRoutine, FrameContext, OrderingConstraint,
    Phase, Routine, RoutineRegistry, Schedule, ScheduleWarning,
};
use orrery_foundation::{ErrorKind, KeywordId};

const POS: KeywordId = KeywordId::DEPENDENCE;

fn noop() -> Box<dyn Routine> {
    FnRoutine::boxed(|_: &mut FrameContext<'_>| Ok(()))
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn identical_registrations_produce_identical_schedules() {
    let build = || {
        let mut registry = RoutineRegistry::new();
        registry
            .register("drift", AccessDeclaration::new().iterate(POS), vec![], noop())
            .unwrap();
        registry
            .register(
                "collide",
                AccessDeclaration::new().read_curr(POS).write(POS),
                vec![],
                noop(),
            )
            .unwrap();
        registry
            .register(
                "despawn",
                AccessDeclaration::new().destroy_entities().read_curr(POS),
                vec![OrderingConstraint::indifferent("collide")],
                noop(),
            )
            .unwrap();
        let schedule = Schedule::build(&registry, &EngineConfig::new()).unwrap();
        Phase::ALL.map(|p| schedule.phase_order(p).to_vec())
    };

    assert_eq!(build(), build());
}

#[test]
fn declaration_order_breaks_ties_within_a_phase() {
    let mut registry = RoutineRegistry::new();
    for name in ["zeta", "alpha", "mid"] {
        registry
            .register(name, AccessDeclaration::new().read_curr(POS), vec![], noop())
            .unwrap();
    }

    let schedule = Schedule::build(&registry, &EngineConfig::new()).unwrap();
    // Registration order, not name order.
    assert_eq!(schedule.phase_order(Phase::LateUpdate), &[0, 1, 2]);
}

// =============================================================================
// Constraints
// =============================================================================

#[test]
fn constraints_reorder_within_the_phase() {
    let mut registry = RoutineRegistry::new();
    registry
        .register("second", AccessDeclaration::new().read_curr(POS), vec![], noop())
        .unwrap();
    registry
        .register(
            "first",
            AccessDeclaration::new().read_curr(POS),
            vec![OrderingConstraint::before("second")],
            noop(),
        )
        .unwrap();

    let schedule = Schedule::build(&registry, &EngineConfig::new()).unwrap();
    assert_eq!(schedule.phase_order(Phase::LateUpdate), &[1, 0]);
}

#[test]
fn indifferent_constraints_change_nothing() {
    let mut registry = RoutineRegistry::new();
    registry
        .register("a", AccessDeclaration::new().read_curr(POS), vec![], noop())
        .unwrap();
    registry
        .register(
            "b",
            AccessDeclaration::new().read_curr(POS),
            vec![OrderingConstraint::indifferent("a")],
            noop(),
        )
        .unwrap();

    let schedule = Schedule::build(&registry, &EngineConfig::new()).unwrap();
    assert_eq!(schedule.phase_order(Phase::LateUpdate), &[0, 1]);
    assert!(schedule.warnings().is_empty());
}

#[test]
fn a_cycle_reports_every_participant() {
    let mut registry = RoutineRegistry::new();
    registry
        .register(
            "a",
            AccessDeclaration::new().read_curr(POS),
            vec![OrderingConstraint::before("b")],
            noop(),
        )
        .unwrap();
    registry
        .register(
            "b",
            AccessDeclaration::new().read_curr(POS),
            vec![OrderingConstraint::before("c")],
            noop(),
        )
        .unwrap();
    registry
        .register(
            "c",
            AccessDeclaration::new().read_curr(POS),
            vec![OrderingConstraint::before("a")],
            noop(),
        )
        .unwrap();

    let err = Schedule::build(&registry, &EngineConfig::new()).unwrap_err();
    match err.kind {
        ErrorKind::OrderingCycle { routines, .. } => {
            assert_eq!(routines.len(), 3);
        }
        other => panic!("expected OrderingCycle, got {other:?}"),
    }
}

// =============================================================================
// Write Conflicts
// =============================================================================

#[test]
fn the_default_policy_keeps_conflicting_schedules_usable() {
    let mut registry = RoutineRegistry::new();
    let writer = || AccessDeclaration::new().write(POS);
    registry.register("one", writer(), vec![], noop()).unwrap();
    registry.register("two", writer(), vec![], noop()).unwrap();

    let schedule = Schedule::build(&registry, &EngineConfig::new()).unwrap();
    assert_eq!(schedule.phase_order(Phase::LateUpdate).len(), 2);
    assert!(matches!(
        schedule.warnings()[0],
        ScheduleWarning::WriteConflict { .. }
    ));
}

#[test]
fn the_reject_policy_names_the_offending_pair() {
    let mut registry = RoutineRegistry::new();
    let writer = || AccessDeclaration::new().write(POS);
    registry.register("one", writer(), vec![], noop()).unwrap();
    registry.register("two", writer(), vec![], noop()).unwrap();

    let config = EngineConfig::new().with_conflict_policy(ConflictPolicy::Reject);
    let err = Schedule::build(&registry, &config).unwrap_err();
    match err.kind {
        ErrorKind::WriteConflict { first, second, .. } => {
            assert_eq!(first, "one");
            assert_eq!(second, "two");
        }
        other => panic!("expected WriteConflict, got {other:?}"),
    }
}

#[test]
fn writers_in_different_phases_never_conflict() {
    let mut registry = RoutineRegistry::new();
    registry
        .register("late", AccessDeclaration::new().write(POS), vec![], noop())
        .unwrap();
    registry
        .register(
            "structural",
            AccessDeclaration::new().write(POS).destroy_entities(),
            vec![],
            noop(),
        )
        .unwrap();

    let schedule = Schedule::build(&registry, &EngineConfig::new()).unwrap();
    assert!(schedule.warnings().is_empty());
}

//! Integration tests for phase classification.
//!
//! The classifier is a pure function of the access declaration: same
//! declaration, same phase, no registration context involved.

use orrery_engine::{AccessDeclaration, AccessViolation, Phase, classify};
use orrery_foundation::KeywordId;

const POS: KeywordId = KeywordId::DEPENDENCE;

// =============================================================================
// The Four Phases
// =============================================================================

#[test]
fn in_place_iteration_without_current_reads_is_core_update() {
    let decl = AccessDeclaration::new().iterate(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::CoreUpdate);

    // Previous-tick reads do not change the placement.
    let decl = AccessDeclaration::new().iterate(POS).read_prev(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::CoreUpdate);
}

#[test]
fn current_tick_reads_push_to_late_update() {
    let decl = AccessDeclaration::new().iterate(POS).read_curr(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::LateUpdate);

    let decl = AccessDeclaration::new().read_curr(POS).write(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::LateUpdate);
}

#[test]
fn lifecycle_access_is_structural() {
    let decl = AccessDeclaration::new().create_entities();
    assert_eq!(classify(&decl).unwrap(), Phase::StructuralChange);

    let decl = AccessDeclaration::new().destroy_entities().read_curr(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::StructuralChange);
}

#[test]
fn relationship_reads_make_structural_access_reactive() {
    let decl = AccessDeclaration::new()
        .destroy_entities()
        .read_relationship_entities(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::ReactiveStructuralChange);

    let decl = AccessDeclaration::new()
        .create_entities()
        .read_relationship_entities(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::ReactiveStructuralChange);
}

#[test]
fn relationship_reads_alone_do_not_make_a_routine_structural() {
    // Reading relationship identities without lifecycle access is an
    // ordinary read.
    let decl = AccessDeclaration::new()
        .read_curr(POS)
        .read_relationship_entities(POS);
    assert_eq!(classify(&decl).unwrap(), Phase::LateUpdate);
}

// =============================================================================
// Illegal Combinations
// =============================================================================

#[test]
fn iteration_excludes_writes_and_lifecycle_access() {
    let decl = AccessDeclaration::new().iterate(POS).write(POS);
    assert_eq!(classify(&decl).unwrap_err(), AccessViolation::IterateWithWrite);

    let decl = AccessDeclaration::new().iterate(POS).create_entities();
    assert_eq!(classify(&decl).unwrap_err(), AccessViolation::IterateWithCreate);

    let decl = AccessDeclaration::new().iterate(POS).destroy_entities();
    assert_eq!(classify(&decl).unwrap_err(), AccessViolation::IterateWithDestroy);
}

#[test]
fn entity_creation_excludes_component_writes() {
    let decl = AccessDeclaration::new().create_entities().write(POS);
    assert_eq!(classify(&decl).unwrap_err(), AccessViolation::CreateWithWrite);
}

#[test]
fn classification_is_stable_across_calls() {
    let decl = AccessDeclaration::new().read_curr(POS).destroy_entities();
    let first = classify(&decl).unwrap();
    for _ in 0..10 {
        assert_eq!(classify(&decl).unwrap(), first);
    }
}

//! Access declarations and phase classification.
//!
//! Every routine declares, once at registration, which component types it
//! touches and how, whether it creates or destroys entities, and which
//! relationship kinds' entity identities it reads. The declaration is
//! immutable after registration; the routine's execution phase is derived
//! from it — never chosen by the author — by a pure, total classification
//! table.

use std::fmt;

use orrery_foundation::KeywordId;
use thiserror::Error;

/// The four execution phases, in per-frame order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// In-place frame-over-frame value updates ("append" semantics).
    CoreUpdate,
    /// General reads and writes of current-tick state.
    LateUpdate,
    /// Entity and relationship creation/destruction.
    StructuralChange,
    /// Structural changes made in reaction to relationship state.
    ReactiveStructuralChange,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 4] = [
        Phase::CoreUpdate,
        Phase::LateUpdate,
        Phase::StructuralChange,
        Phase::ReactiveStructuralChange,
    ];

    /// Stable name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CoreUpdate => "CoreUpdate",
            Self::LateUpdate => "LateUpdate",
            Self::StructuralChange => "StructuralChange",
            Self::ReactiveStructuralChange => "ReactiveStructuralChange",
        }
    }

    /// Index into per-phase tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::CoreUpdate => 0,
            Self::LateUpdate => 1,
            Self::StructuralChange => 2,
            Self::ReactiveStructuralChange => 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a routine accesses one component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Reads the value as of the previous tick.
    ReadPrevTick,
    /// Reads the value as of the current tick.
    ReadCurrTick,
    /// Writes the value.
    Write,
    /// Mutates a running value in place, frame over frame.
    IterateInPlace,
}

/// Static access metadata attached to a routine at registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessDeclaration {
    accesses: Vec<(KeywordId, AccessMode)>,
    creates_entities: bool,
    destroys_entities: bool,
    reads_relationships: Vec<KeywordId>,
}

impl AccessDeclaration {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a previous-tick read of a component type.
    #[must_use]
    pub fn read_prev(mut self, component: KeywordId) -> Self {
        self.accesses.push((component, AccessMode::ReadPrevTick));
        self
    }

    /// Declares a current-tick read of a component type.
    #[must_use]
    pub fn read_curr(mut self, component: KeywordId) -> Self {
        self.accesses.push((component, AccessMode::ReadCurrTick));
        self
    }

    /// Declares a write of a component type.
    #[must_use]
    pub fn write(mut self, component: KeywordId) -> Self {
        self.accesses.push((component, AccessMode::Write));
        self
    }

    /// Declares an in-place iteration over a component type.
    #[must_use]
    pub fn iterate(mut self, component: KeywordId) -> Self {
        self.accesses.push((component, AccessMode::IterateInPlace));
        self
    }

    /// Declares that the routine creates entities.
    #[must_use]
    pub fn create_entities(mut self) -> Self {
        self.creates_entities = true;
        self
    }

    /// Declares that the routine destroys entities.
    #[must_use]
    pub fn destroy_entities(mut self) -> Self {
        self.destroys_entities = true;
        self
    }

    /// Declares that the routine reads the entity identities of a
    /// relationship kind.
    #[must_use]
    pub fn read_relationship_entities(mut self, kind: KeywordId) -> Self {
        self.reads_relationships.push(kind);
        self
    }

    /// All declared `(component, mode)` pairs.
    #[must_use]
    pub fn accesses(&self) -> &[(KeywordId, AccessMode)] {
        &self.accesses
    }

    /// Returns true if any access uses the given mode.
    #[must_use]
    pub fn has_mode(&self, mode: AccessMode) -> bool {
        self.accesses.iter().any(|(_, m)| *m == mode)
    }

    /// Component types the routine writes.
    pub fn written_components(&self) -> impl Iterator<Item = KeywordId> + '_ {
        self.accesses
            .iter()
            .filter(|(_, m)| *m == AccessMode::Write)
            .map(|(c, _)| *c)
    }

    /// Whether the routine creates entities.
    #[must_use]
    pub fn creates_entities(&self) -> bool {
        self.creates_entities
    }

    /// Whether the routine destroys entities.
    #[must_use]
    pub fn destroys_entities(&self) -> bool {
        self.destroys_entities
    }

    /// Relationship kinds whose entity identities the routine reads.
    #[must_use]
    pub fn relationship_reads(&self) -> &[KeywordId] {
        &self.reads_relationships
    }
}

/// An illegal access combination, rejected at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessViolation {
    /// In-place iteration combined with a component write.
    #[error("IterateInPlace cannot be combined with Write")]
    IterateWithWrite,
    /// In-place iteration combined with entity creation.
    #[error("IterateInPlace cannot be combined with CreatesEntities")]
    IterateWithCreate,
    /// In-place iteration combined with entity destruction.
    #[error("IterateInPlace cannot be combined with DestroysEntities")]
    IterateWithDestroy,
    /// Entity creation combined with a component write.
    #[error("CreatesEntities cannot be combined with Write")]
    CreateWithWrite,
}

/// Derives the execution phase for a declaration.
///
/// The table is pure and total: every declaration either maps to exactly one
/// phase or is rejected as one of the illegal combinations. Nothing falls
/// through to a silent default.
///
/// # Errors
///
/// Returns the violated combination for the two illegal marker pairings.
pub fn classify(declaration: &AccessDeclaration) -> Result<Phase, AccessViolation> {
    let iterates = declaration.has_mode(AccessMode::IterateInPlace);
    let writes = declaration.has_mode(AccessMode::Write);
    let reads_curr = declaration.has_mode(AccessMode::ReadCurrTick);
    let structural = declaration.creates_entities || declaration.destroys_entities;

    if iterates && writes {
        return Err(AccessViolation::IterateWithWrite);
    }
    if iterates && declaration.creates_entities {
        return Err(AccessViolation::IterateWithCreate);
    }
    if iterates && declaration.destroys_entities {
        return Err(AccessViolation::IterateWithDestroy);
    }
    if declaration.creates_entities && writes {
        return Err(AccessViolation::CreateWithWrite);
    }

    if structural {
        if declaration.reads_relationships.is_empty() {
            Ok(Phase::StructuralChange)
        } else {
            Ok(Phase::ReactiveStructuralChange)
        }
    } else if iterates && !reads_curr {
        Ok(Phase::CoreUpdate)
    } else {
        Ok(Phase::LateUpdate)
    }
}

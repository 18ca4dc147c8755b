//! Component payload values.
//!
//! The core does not interpret component data; it only stores and moves it.
//! `Value` is the small tagged payload attached to a `(entity, component)`
//! pair, rich enough for the core's own bookkeeping and for host modules to
//! carry scalars, names, and entity references.

use std::fmt;

use crate::entity::EntityId;
use crate::intern::KeywordId;

/// A component value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absence of a value (distinct from the component being absent).
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Interned keyword.
    Keyword(KeywordId),
    /// Reference to another entity.
    Entity(EntityId),
    /// Owned text.
    Text(String),
}

impl Value {
    /// Returns true for [`Value::Nil`].
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the entity reference, if this is one.
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::Entity(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Keyword(k) => write!(f, ":{}", k.index()),
            Self::Entity(e) => write!(f, "{e}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<EntityId> for Value {
    fn from(e: EntityId) -> Self {
        Self::Entity(e)
    }
}

impl From<KeywordId> for Value {
    fn from(k: KeywordId) -> Self {
        Self::Keyword(k)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

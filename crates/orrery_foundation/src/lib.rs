//! Shared primitives for the Orrery simulation backbone.
//!
//! This crate provides:
//! - [`EntityId`] - Generational entity identifiers
//! - [`Interner`] / [`KeywordId`] - Interned names for component types,
//!   relationship kinds, roles, and routines
//! - [`Value`] - The component payload type
//! - [`Error`] - Rich error types with helper constructors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod entity;
mod error;
mod intern;
mod value;

pub use entity::EntityId;
pub use error::{Error, ErrorKind, Result};
pub use intern::{Interner, KeywordId};
pub use value::Value;

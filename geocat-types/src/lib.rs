//! Core type definitions for the geocat catalog.
//!
//! This crate defines the identity primitives shared by every layer:
//! - [`CatalogId`], the opaque identity token assigned once per entity
//! - [`InfoType`], the type partition an entity is stored under
//! - [`IdGenerator`], the injectable utility that mints identities on add
//!
//! Entity shapes live in `geocat-model`; nothing here knows what a
//! workspace or a layer looks like.

mod ids;
mod kind;

pub use ids::{CatalogId, IdGenerator, UuidIdGenerator};
pub use kind::InfoType;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid catalog id: {0}")]
    InvalidId(String),

    #[error("unknown info type: {0}")]
    UnknownType(String),
}

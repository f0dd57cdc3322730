//! Identity tokens for catalog entities.
//!
//! An identity is opaque to everything above the store. Generated ids take the
//! form `<TypeName>.<uuid>`; ids carried in from another catalog (during a
//! sync) are preserved verbatim, whatever their shape.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique, immutable identity of a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    /// Generates a new random id scoped by `prefix` (usually a type name).
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{prefix}.{}", Uuid::new_v4()))
    }

    /// Wraps an existing identity string.
    ///
    /// Fails on empty or whitespace-only input.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.trim().is_empty() {
            return Err(Error::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the prefix before the first `.`, if the id has one.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once('.').map(|(prefix, _)| prefix)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CatalogId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CatalogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CatalogId> for serde_json::Value {
    fn from(id: CatalogId) -> Self {
        serde_json::Value::String(id.0)
    }
}

impl From<&CatalogId> for serde_json::Value {
    fn from(id: &CatalogId) -> Self {
        serde_json::Value::String(id.0.clone())
    }
}

/// Mints identities for entities added without one.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh id, unique among entities sharing `prefix`.
    fn generate(&self, prefix: &str) -> CatalogId;
}

/// Default generator: `<prefix>.<random uuid v4>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self, prefix: &str) -> CatalogId {
        CatalogId::generate(prefix)
    }
}

//! Entity store for the geocat catalog.
//!
//! Persists catalog entities as JSON documents, partitioned by [`InfoType`].
//!
//! # Architecture
//!
//! - [`CatalogBackend`] is the object-safe, type-erased store: documents in,
//!   documents out, plus a natural-key index and the default-pointer registry
//! - [`MemoryBackend`] keeps everything in insertion-ordered maps
//! - [`SqliteBackend`] persists to SQLite; filters are pushed down as a
//!   `json_extract` prefilter and re-checked in Rust
//! - [`EntityStore`] is the typed layer callers use: id assignment, sorting,
//!   pagination, unique lookups and closeable query cursors ([`InfoIter`])
//!
//! Uniqueness of natural keys is enforced atomically by the backend, so two
//! concurrent adds with the same key can never both succeed.

mod backend;
mod cursor;
mod entity_store;
mod error;
mod memory;
mod sql_filter;
mod sqlite;

pub use backend::CatalogBackend;
pub use cursor::InfoIter;
pub use entity_store::EntityStore;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

pub use geocat_model::InfoType;

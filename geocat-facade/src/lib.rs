//! Catalog facade for geocat.
//!
//! [`CatalogFacade`] is the public API over the entity store:
//! - CRUD for every catalog type, with validation and reference checks
//! - typed lookups by id, name, prefix and owning workspace or namespace
//! - default pointers (workspace, namespace, per-workspace data store)
//! - change notifications through [`CatalogListener`]
//!
//! Writes are serialized by one catalog-wide lock. Reads never take it.

mod config;
mod defaults;
mod error;
mod events;
mod facade;
mod integrity;
mod lookup;
mod scope;

pub use config::{BackendConfig, CatalogConfig};
pub use defaults::{default_store_key, DEFAULT_NAMESPACE_KEY, DEFAULT_WORKSPACE_KEY};
pub use error::{CatalogError, CatalogResult};
pub use events::{AddEvent, CatalogEvents, CatalogListener, EventSubject, ModifyEvent, RemoveEvent};
pub use facade::CatalogFacade;
pub use scope::{NamespaceScope, WorkspaceScope};

//! Whole-catalog replication for geocat.
//!
//! [`FacadeSynchronizer`] copies every entity and default pointer of one
//! [`CatalogFacade`](geocat_facade::CatalogFacade) into another, preserving
//! ids. It is used to migrate a catalog between backends, e.g. from an
//! in-memory catalog into a SQLite file.
//!
//! # Example
//!
//! ```
//! use geocat_facade::CatalogFacade;
//! use geocat_model::Workspace;
//! use geocat_sync::SyncTo;
//!
//! let source = CatalogFacade::in_memory();
//! source.add(Workspace::new("acme")).unwrap();
//!
//! let target = CatalogFacade::in_memory();
//! let report = source.sync_to(&target).unwrap();
//! assert_eq!(report.total_replicated(), 1);
//! ```

mod error;
mod report;
mod synchronizer;

pub use error::{SyncError, SyncResult};
pub use report::{SyncReport, SyncStage};
pub use synchronizer::{FacadeSynchronizer, SyncMode, SyncOptions, SyncTo};

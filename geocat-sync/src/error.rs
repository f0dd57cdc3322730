//! Error types for catalog replication.

use crate::{SyncReport, SyncStage};
use geocat_facade::CatalogError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A write to the target failed partway through.
    ///
    /// Nothing is rolled back: `report` lists what the target already holds.
    #[error("sync interrupted at {stage} after {} copied: {source}", .report.total_replicated())]
    Interrupted {
        stage: SyncStage,
        report: SyncReport,
        source: CatalogError,
    },

    /// Reading from the source failed before anything was written for the
    /// stage.
    #[error("failed to read {stage} from source: {source}")]
    Source {
        stage: SyncStage,
        source: CatalogError,
    },

    /// Source and target are the same facade.
    #[error("cannot sync a catalog into itself")]
    SameCatalog,
}

impl SyncError {
    /// The stage that failed, if any.
    pub fn stage(&self) -> Option<SyncStage> {
        match self {
            SyncError::Interrupted { stage, .. } | SyncError::Source { stage, .. } => Some(*stage),
            SyncError::SameCatalog => None,
        }
    }
}

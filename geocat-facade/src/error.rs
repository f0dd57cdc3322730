//! Error types for the catalog facade.

use geocat_model::{InfoType, ModelError};
use geocat_storage::StorageError;
use thiserror::Error;

/// Result type for facade operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced to catalog callers.
///
/// Everything except [`CatalogError::Storage`] and [`CatalogError::Config`]
/// is a caller fault; see [`CatalogError::is_client_error`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Required property missing or entity structurally invalid.
    #[error("validation failed: {0}")]
    Validation(#[from] ModelError),

    /// A pre-modify listener rejected the change.
    #[error("change vetoed: {0}")]
    Vetoed(String),

    #[error("{0} has no id")]
    MissingId(InfoType),

    /// Save of an entity that is not persisted.
    #[error("{info_type} not found: {id}")]
    NotFound { info_type: InfoType, id: String },

    /// An outgoing reference does not resolve to a persisted entity.
    #[error("`{property}` references missing {info_type} {id}")]
    ReferenceNotFound {
        property: String,
        info_type: InfoType,
        id: String,
    },

    /// Uniqueness violation.
    #[error("duplicate {info_type}: {key}")]
    Duplicate { info_type: InfoType, key: String },

    #[error("ambiguous {info_type} lookup: more than one match for {filter}")]
    Ambiguous { info_type: InfoType, filter: String },

    #[error("cannot sort {info_type} on `{property}`")]
    UnsupportedSort { info_type: InfoType, property: String },

    /// Removal refused because other entities still point at the target.
    #[error("cannot remove {info_type} {id}: still referenced by {count} {referrer}")]
    StillReferenced {
        info_type: InfoType,
        id: String,
        referrer: InfoType,
        count: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl CatalogError {
    /// True for errors caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CatalogError::Storage(_) | CatalogError::Config(_))
    }
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Model(e) => CatalogError::Validation(e),
            StorageError::MissingId { info_type } => CatalogError::MissingId(info_type),
            StorageError::NotFound { info_type, id } => CatalogError::NotFound { info_type, id },
            StorageError::Duplicate { info_type, key } => CatalogError::Duplicate { info_type, key },
            StorageError::DuplicateId { info_type, id } => CatalogError::Duplicate {
                info_type,
                key: format!("id::{id}"),
            },
            StorageError::Ambiguous { info_type, filter } => CatalogError::Ambiguous { info_type, filter },
            StorageError::UnsupportedSort { info_type, property } => {
                CatalogError::UnsupportedSort { info_type, property }
            }
            other => CatalogError::Storage(other),
        }
    }
}

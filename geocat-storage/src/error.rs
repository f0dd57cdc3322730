//! Error types for the storage layer.

use geocat_model::{InfoType, ModelError};
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document could not be converted to or from its typed entity.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Entity not found where one was required (e.g. updating a missing row).
    #[error("{info_type} not found: {id}")]
    NotFound { info_type: InfoType, id: String },

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Save or remove of an entity that was never assigned an id.
    #[error("{info_type} has no id")]
    MissingId { info_type: InfoType },

    /// Add of an entity whose id is already taken.
    #[error("{info_type} with id {id} already exists")]
    DuplicateId { info_type: InfoType, id: String },

    /// A natural key is already owned by another entity.
    #[error("{info_type} natural key already in use: {key}")]
    Duplicate { info_type: InfoType, key: String },

    /// A unique lookup matched more than one entity.
    #[error("ambiguous {info_type} query, more than one match for {filter}")]
    Ambiguous { info_type: InfoType, filter: String },

    /// Sort requested on a property the type cannot sort on.
    #[error("cannot sort {info_type} on `{property}`")]
    UnsupportedSort { info_type: InfoType, property: String },

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

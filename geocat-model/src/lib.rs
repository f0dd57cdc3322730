//! Catalog entity model for geocat.
//!
//! Defines the types every other layer depends on:
//! - the entity shapes ([`Workspace`], [`Namespace`], [`Store`], [`Resource`],
//!   [`Layer`], [`LayerGroup`], [`Style`], [`MapInfo`])
//! - [`CatalogInfo`]: the trait each entity implements (identity, validation,
//!   natural keys, outgoing references)
//! - [`Document`]: the type-erased JSON form the store persists
//! - [`Predicate`], [`Query`] and [`SortBy`]: the filter/ordering language
//!   evaluated against dotted property paths
//! - [`InfoSchema`]: which properties of a type exist and can be sorted on
//! - [`Tracked`]: the change-tracking wrapper used by the save protocol
//!
//! Entities serialize with camelCase property names, so a store's workspace id
//! is addressed as `workspace.id` and a layer's default style as
//! `defaultStyle.id`.

mod document;
mod info;
mod layer;
mod map;
mod predicate;
pub mod property;
mod query;
mod resource;
mod schema;
mod store;
mod style;
mod tracking;
mod workspace;

pub use document::Document;
pub use info::{CatalogInfo, InfoRef, NaturalKey, Reference};
pub use layer::{Layer, LayerGroup, LayerGroupMode, PublishedRef};
pub use map::MapInfo;
pub use predicate::Predicate;
pub use query::{Query, SortBy, SortOrder};
pub use resource::{MetadataLink, Resource, ResourceDetails, ResourceKind};
pub use schema::{FieldType, InfoSchema, PropertyField};
pub use store::{Store, StoreDetails, StoreKind};
pub use style::Style;
pub use tracking::{ChangeSet, PropertyChange, Tracked};
pub use workspace::{Namespace, Workspace};

pub use geocat_types::{CatalogId, InfoType};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by entity validation and change tracking.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A name-like identity property is null or empty.
    #[error("{info_type} property `{property}` must not be null or empty")]
    RequiredProperty {
        info_type: InfoType,
        property: &'static str,
    },

    /// The entity is structurally invalid.
    #[error("invalid {info_type}: {message}")]
    Invalid { info_type: InfoType, message: String },

    /// The entity has no identity yet.
    #[error("{0} has no id")]
    MissingId(InfoType),

    /// Attempted to change a property that is fixed once assigned.
    #[error("property `{0}` cannot be modified")]
    ImmutableProperty(String),

    /// The property does not exist on the entity.
    #[error("unknown property `{property}` on {info_type}")]
    UnknownProperty {
        info_type: InfoType,
        property: String,
    },

    /// A document was stored under a different type than requested.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: InfoType, found: InfoType },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fails with [`ModelError::RequiredProperty`] when `value` is absent or empty.
pub(crate) fn require_text(
    info_type: InfoType,
    property: &'static str,
    value: Option<&str>,
) -> ModelResult<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ModelError::RequiredProperty {
            info_type,
            property,
        }),
    }
}

/// Fails with [`ModelError::RequiredProperty`] when a reference is unset.
pub(crate) fn require_ref(
    info_type: InfoType,
    property: &'static str,
    value: Option<&InfoRef>,
) -> ModelResult<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(ModelError::RequiredProperty {
            info_type,
            property,
        }),
    }
}

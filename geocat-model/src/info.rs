use crate::{ModelError, ModelResult};
use geocat_types::{CatalogId, InfoType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common behaviour of every catalog entity.
///
/// Identity is assigned through [`CatalogInfo::set_id`] exactly once, by the
/// entity store on add. Everything else about the entity is plain data that
/// round-trips through JSON.
pub trait CatalogInfo:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The store partition this entity lives in.
    const TYPE: InfoType;

    /// The entity's identity, if it has been assigned.
    fn id(&self) -> Option<&CatalogId>;

    /// Assigns the identity. Called by the store, never by callers.
    fn set_id(&mut self, id: CatalogId);

    /// Prefix for generated ids. Variant families override this so data
    /// stores get `DataStoreInfo.*` ids and coverages `CoverageInfo.*`.
    fn id_prefix(&self) -> &'static str {
        Self::TYPE.type_name()
    }

    /// Checks required properties and structural invariants.
    fn validate(&self) -> ModelResult<()>;

    /// Natural keys that must be unique among entities of this type.
    fn natural_keys(&self) -> Vec<NaturalKey>;

    /// Outgoing references to other persisted entities.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// A short human label for logs.
    fn label(&self) -> String {
        self.id()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("unsaved {}", Self::TYPE))
    }

    /// A reference to this entity, for embedding in other entities.
    fn reference(&self) -> ModelResult<InfoRef> {
        self.id()
            .cloned()
            .map(InfoRef::new)
            .ok_or(ModelError::MissingId(Self::TYPE))
    }
}

/// A by-identity reference to another entity.
///
/// Serializes as `{"id": "..."}`, which is what makes `workspace.id` and
/// friends resolvable as dotted property paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InfoRef {
    pub id: CatalogId,
}

impl InfoRef {
    pub fn new(id: CatalogId) -> Self {
        Self { id }
    }

    /// References `info` if it has an id.
    pub fn to<T: CatalogInfo>(info: &T) -> Option<Self> {
        info.id().cloned().map(Self::new)
    }
}

impl From<CatalogId> for InfoRef {
    fn from(id: CatalogId) -> Self {
        Self::new(id)
    }
}

/// A uniqueness constraint value: `property` must be unique within `scope`.
///
/// `scope` is the identity of the owning entity (workspace for stores,
/// namespace for resources) or `None` for the global scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub property: &'static str,
    pub scope: Option<CatalogId>,
    pub value: String,
}

impl NaturalKey {
    pub fn global(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            scope: None,
            value: value.into(),
        }
    }

    pub fn scoped(property: &'static str, scope: Option<&CatalogId>, value: impl Into<String>) -> Self {
        Self {
            property,
            scope: scope.cloned(),
            value: value.into(),
        }
    }
}

/// Renders `property:"scope":"value"`, or `property::"value"` for the global
/// scope. Scope and value are quoted and escaped, so distinct keys never
/// render alike and the rendering doubles as the stored uniqueness key.
impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}:{:?}:{:?}", self.property, scope.as_str(), self.value),
            None => write!(f, "{}::{:?}", self.property, self.value),
        }
    }
}

/// An outgoing reference that must resolve to a persisted entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Property path holding the reference, e.g. `workspace`.
    pub property: &'static str,
    pub info_type: InfoType,
    pub id: CatalogId,
}

impl Reference {
    pub fn new(property: &'static str, info_type: InfoType, id: &CatalogId) -> Self {
        Self {
            property,
            info_type,
            id: id.clone(),
        }
    }
}

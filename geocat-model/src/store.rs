use crate::{require_ref, require_text, CatalogInfo, InfoRef, ModelResult, NaturalKey, Reference, Workspace};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A connection to a data source, owned by a workspace.
///
/// Shared fields live here; what differs between data stores and coverage
/// stores lives in [`StoreDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub name: Option<String>,
    pub workspace: Option<InfoRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub details: StoreDetails,
}

fn enabled_by_default() -> bool {
    true
}

/// Variant payload of a [`Store`]. Serialized with a `type` tag, so the
/// variant is queryable as `details.type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreDetails {
    DataStore {
        #[serde(default)]
        parameters: BTreeMap<String, String>,
    },
    CoverageStore {
        #[serde(default)]
        url: Option<String>,
    },
}

/// Discriminant of [`StoreDetails`], used to narrow lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    DataStore,
    CoverageStore,
}

impl StoreKind {
    /// The `details.type` tag value for this variant.
    pub const fn tag(self) -> &'static str {
        match self {
            StoreKind::DataStore => "DataStore",
            StoreKind::CoverageStore => "CoverageStore",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Store {
    /// A data store named `name` inside `workspace`.
    pub fn data_store(name: impl Into<String>, workspace: &Workspace) -> Self {
        Self::with_details(
            name,
            workspace,
            StoreDetails::DataStore {
                parameters: BTreeMap::new(),
            },
        )
    }

    /// A coverage store named `name` inside `workspace`.
    pub fn coverage_store(name: impl Into<String>, workspace: &Workspace) -> Self {
        Self::with_details(name, workspace, StoreDetails::CoverageStore { url: None })
    }

    fn with_details(name: impl Into<String>, workspace: &Workspace, details: StoreDetails) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            workspace: InfoRef::to(workspace),
            description: None,
            enabled: true,
            details,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn workspace_id(&self) -> Option<&CatalogId> {
        self.workspace.as_ref().map(|r| &r.id)
    }

    pub fn kind(&self) -> StoreKind {
        match self.details {
            StoreDetails::DataStore { .. } => StoreKind::DataStore,
            StoreDetails::CoverageStore { .. } => StoreKind::CoverageStore,
        }
    }

    pub fn is_data_store(&self) -> bool {
        self.kind() == StoreKind::DataStore
    }
}

impl CatalogInfo for Store {
    const TYPE: InfoType = InfoType::Store;

    fn id(&self) -> Option<&CatalogId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CatalogId) {
        self.id = Some(id);
    }

    fn id_prefix(&self) -> &'static str {
        match self.kind() {
            StoreKind::DataStore => "DataStoreInfo",
            StoreKind::CoverageStore => "CoverageStoreInfo",
        }
    }

    fn validate(&self) -> ModelResult<()> {
        require_text(Self::TYPE, "name", self.name())?;
        require_ref(Self::TYPE, "workspace", self.workspace.as_ref())
    }

    fn natural_keys(&self) -> Vec<NaturalKey> {
        self.name
            .iter()
            .map(|name| NaturalKey::scoped("name", self.workspace_id(), name.as_str()))
            .collect()
    }

    fn references(&self) -> Vec<Reference> {
        self.workspace_id()
            .map(|id| Reference::new("workspace", InfoType::Workspace, id))
            .into_iter()
            .collect()
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

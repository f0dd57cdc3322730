use crate::{
    require_ref, require_text, CatalogInfo, InfoRef, ModelResult, Namespace, NaturalKey, Reference, Store,
};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dataset published from a store: a feature type or a coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub name: Option<String>,
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub metadata_links: Vec<MetadataLink>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub store: Option<InfoRef>,
    pub namespace: Option<InfoRef>,
    pub details: ResourceDetails,
}

fn enabled_by_default() -> bool {
    true
}

/// Link to an external metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataLink {
    pub metadata_type: String,
    pub mime_type: String,
    pub content: String,
}

/// Variant payload of a [`Resource`], tagged as `details.type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResourceDetails {
    FeatureType {
        #[serde(default)]
        srs: Option<String>,
    },
    Coverage {
        #[serde(default)]
        format: Option<String>,
    },
}

/// Discriminant of [`ResourceDetails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    FeatureType,
    Coverage,
}

impl ResourceKind {
    pub const fn tag(self) -> &'static str {
        match self {
            ResourceKind::FeatureType => "FeatureType",
            ResourceKind::Coverage => "Coverage",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Resource {
    /// A feature type published from `store` under `namespace`.
    pub fn feature_type(name: impl Into<String>, store: &Store, namespace: &Namespace) -> Self {
        Self::with_details(name, store, namespace, ResourceDetails::FeatureType { srs: None })
    }

    /// A coverage published from `store` under `namespace`.
    pub fn coverage(name: impl Into<String>, store: &Store, namespace: &Namespace) -> Self {
        Self::with_details(name, store, namespace, ResourceDetails::Coverage { format: None })
    }

    fn with_details(
        name: impl Into<String>,
        store: &Store,
        namespace: &Namespace,
        details: ResourceDetails,
    ) -> Self {
        let name = name.into();
        Self {
            id: None,
            native_name: Some(name.clone()),
            name: Some(name),
            title: None,
            description: None,
            keywords: Vec::new(),
            metadata_links: Vec::new(),
            enabled: true,
            store: InfoRef::to(store),
            namespace: InfoRef::to(namespace),
            details,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn store_id(&self) -> Option<&CatalogId> {
        self.store.as_ref().map(|r| &r.id)
    }

    pub fn namespace_id(&self) -> Option<&CatalogId> {
        self.namespace.as_ref().map(|r| &r.id)
    }

    pub fn kind(&self) -> ResourceKind {
        match self.details {
            ResourceDetails::FeatureType { .. } => ResourceKind::FeatureType,
            ResourceDetails::Coverage { .. } => ResourceKind::Coverage,
        }
    }
}

impl CatalogInfo for Resource {
    const TYPE: InfoType = InfoType::Resource;

    fn id(&self) -> Option<&CatalogId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CatalogId) {
        self.id = Some(id);
    }

    fn id_prefix(&self) -> &'static str {
        match self.kind() {
            ResourceKind::FeatureType => "FeatureTypeInfo",
            ResourceKind::Coverage => "CoverageInfo",
        }
    }

    fn validate(&self) -> ModelResult<()> {
        require_text(Self::TYPE, "name", self.name())?;
        require_ref(Self::TYPE, "store", self.store.as_ref())?;
        require_ref(Self::TYPE, "namespace", self.namespace.as_ref())
    }

    fn natural_keys(&self) -> Vec<NaturalKey> {
        self.name
            .iter()
            .map(|name| NaturalKey::scoped("name", self.namespace_id(), name.as_str()))
            .collect()
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::with_capacity(2);
        if let Some(id) = self.store_id() {
            refs.push(Reference::new("store", InfoType::Store, id));
        }
        if let Some(id) = self.namespace_id() {
            refs.push(Reference::new("namespace", InfoType::Namespace, id));
        }
        refs
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

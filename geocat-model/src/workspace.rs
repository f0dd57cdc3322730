use crate::{require_text, CatalogInfo, ModelResult, NaturalKey};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};

/// Top-level container for stores, styles and layer groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub name: Option<String>,
    #[serde(default)]
    pub isolated: bool,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CatalogInfo for Workspace {
    const TYPE: InfoType = InfoType::Workspace;

    fn id(&self) -> Option<&CatalogId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CatalogId) {
        self.id = Some(id);
    }

    fn validate(&self) -> ModelResult<()> {
        require_text(Self::TYPE, "name", self.name())
    }

    fn natural_keys(&self) -> Vec<NaturalKey> {
        self.name
            .iter()
            .map(|name| NaturalKey::global("name", name.as_str()))
            .collect()
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

/// XML namespace paired with a workspace (by convention `prefix == name`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub prefix: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub isolated: bool,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

impl CatalogInfo for Namespace {
    const TYPE: InfoType = InfoType::Namespace;

    fn id(&self) -> Option<&CatalogId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CatalogId) {
        self.id = Some(id);
    }

    fn validate(&self) -> ModelResult<()> {
        require_text(Self::TYPE, "prefix", self.prefix())?;
        require_text(Self::TYPE, "uri", self.uri())
    }

    fn natural_keys(&self) -> Vec<NaturalKey> {
        let mut keys = Vec::with_capacity(2);
        if let Some(prefix) = &self.prefix {
            keys.push(NaturalKey::global("prefix", prefix.as_str()));
        }
        // Isolated namespaces may reuse the uri of another namespace.
        if let Some(uri) = self.uri.as_ref().filter(|_| !self.isolated) {
            keys.push(NaturalKey::global("uri", uri.as_str()));
        }
        keys
    }

    fn label(&self) -> String {
        self.prefix.clone().unwrap_or_default()
    }
}

use crate::{require_text, CatalogInfo, ModelResult, NaturalKey};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};

/// Legacy map aggregate. Only its name is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl MapInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            enabled: true,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CatalogInfo for MapInfo {
    const TYPE: InfoType = InfoType::Map;

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

use crate::{require_text, CatalogInfo, InfoRef, ModelResult, NaturalKey, Reference, Workspace};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};

/// A named rendering style, global or owned by a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub name: Option<String>,
    #[serde(default)]
    pub workspace: Option<InfoRef>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl Style {
    /// A global style.
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    /// A style owned by `workspace`.
    pub fn in_workspace(name: impl Into<String>, filename: impl Into<String>, workspace: &Workspace) -> Self {
        Self {
            workspace: InfoRef::to(workspace),
            ..Self::new(name, filename)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn workspace_id(&self) -> Option<&CatalogId> {
        self.workspace.as_ref().map(|r| &r.id)
    }
}

impl CatalogInfo for Style {
    const TYPE: InfoType = InfoType::Style;

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

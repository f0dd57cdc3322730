use crate::{require_ref, require_text, CatalogInfo, InfoRef, ModelError, ModelResult, NaturalKey, Reference, Resource};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Publishes a resource with a default style and optional alternates.
///
/// A layer has no name of its own: its effective name is the name of the
/// resource it publishes, and a resource is published by at most one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub resource: Option<InfoRef>,
    #[serde(default)]
    pub default_style: Option<InfoRef>,
    #[serde(default)]
    pub styles: BTreeSet<InfoRef>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Layer {
    pub fn new(resource: &Resource) -> Self {
        Self {
            id: None,
            resource: InfoRef::to(resource),
            default_style: None,
            styles: BTreeSet::new(),
            path: None,
            enabled: true,
        }
    }

    pub fn resource_id(&self) -> Option<&CatalogId> {
        self.resource.as_ref().map(|r| &r.id)
    }

    pub fn default_style_id(&self) -> Option<&CatalogId> {
        self.default_style.as_ref().map(|r| &r.id)
    }

    /// True if `style` is the default style or one of the alternates.
    pub fn uses_style(&self, style: &CatalogId) -> bool {
        self.default_style_id() == Some(style) || self.styles.iter().any(|s| &s.id == style)
    }
}

impl CatalogInfo for Layer {
    const TYPE: InfoType = InfoType::Layer;

    fn id(&self) -> Option<&CatalogId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CatalogId) {
        self.id = Some(id);
    }

    fn validate(&self) -> ModelResult<()> {
        require_ref(Self::TYPE, "resource", self.resource.as_ref())
    }

    fn natural_keys(&self) -> Vec<NaturalKey> {
        self.resource_id()
            .map(|id| NaturalKey::global("resource", id.as_str()))
            .into_iter()
            .collect()
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::with_capacity(2 + self.styles.len());
        if let Some(id) = self.resource_id() {
            refs.push(Reference::new("resource", InfoType::Resource, id));
        }
        if let Some(id) = self.default_style_id() {
            refs.push(Reference::new("defaultStyle", InfoType::Style, id));
        }
        refs.extend(
            self.styles
                .iter()
                .map(|s| Reference::new("styles", InfoType::Style, &s.id)),
        );
        refs
    }
}

/// How a layer group is presented to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerGroupMode {
    #[default]
    Single,
    Named,
    Container,
    Eo,
}

/// A member of a layer group: a layer or a nested group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PublishedRef {
    Layer { id: CatalogId },
    LayerGroup { id: CatalogId },
}

impl PublishedRef {
    pub fn id(&self) -> &CatalogId {
        match self {
            PublishedRef::Layer { id } | PublishedRef::LayerGroup { id } => id,
        }
    }

    pub fn info_type(&self) -> InfoType {
        match self {
            PublishedRef::Layer { .. } => InfoType::Layer,
            PublishedRef::LayerGroup { .. } => InfoType::LayerGroup,
        }
    }

    pub fn layer(layer: &Layer) -> ModelResult<Self> {
        Ok(PublishedRef::Layer {
            id: layer.reference()?.id,
        })
    }

    pub fn group(group: &LayerGroup) -> ModelResult<Self> {
        Ok(PublishedRef::LayerGroup {
            id: group.reference()?.id,
        })
    }
}

/// An ordered bundle of layers and nested groups, each with an optional
/// style override at the same position in `styles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mode: LayerGroupMode,
    #[serde(default)]
    pub workspace: Option<InfoRef>,
    #[serde(default)]
    pub layers: Vec<PublishedRef>,
    #[serde(default)]
    pub styles: Vec<Option<InfoRef>>,
}

impl LayerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn workspace_id(&self) -> Option<&CatalogId> {
        self.workspace.as_ref().map(|r| &r.id)
    }

    /// Appends a member with an optional style override, keeping `layers`
    /// and `styles` parallel.
    pub fn push(&mut self, member: PublishedRef, style: Option<InfoRef>) {
        self.layers.push(member);
        self.styles.push(style);
    }

    /// Ids of directly nested groups.
    pub fn nested_groups(&self) -> impl Iterator<Item = &CatalogId> {
        self.layers.iter().filter_map(|member| match member {
            PublishedRef::LayerGroup { id } => Some(id),
            PublishedRef::Layer { .. } => None,
        })
    }
}

impl CatalogInfo for LayerGroup {
    const TYPE: InfoType = InfoType::LayerGroup;

    fn id(&self) -> Option<&CatalogId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CatalogId) {
        self.id = Some(id);
    }

    fn validate(&self) -> ModelResult<()> {
        require_text(Self::TYPE, "name", self.name())?;
        if self.styles.len() != self.layers.len() {
            return Err(ModelError::Invalid {
                info_type: Self::TYPE,
                message: format!(
                    "{} layers but {} styles",
                    self.layers.len(),
                    self.styles.len()
                ),
            });
        }
        Ok(())
    }

    fn natural_keys(&self) -> Vec<NaturalKey> {
        self.name
            .iter()
            .map(|name| NaturalKey::scoped("name", self.workspace_id(), name.as_str()))
            .collect()
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        if let Some(id) = self.workspace_id() {
            refs.push(Reference::new("workspace", InfoType::Workspace, id));
        }
        refs.extend(
            self.layers
                .iter()
                .map(|m| Reference::new("layers", m.info_type(), m.id())),
        );
        refs.extend(
            self.styles
                .iter()
                .flatten()
                .map(|s| Reference::new("styles", InfoType::Style, &s.id)),
        );
        refs
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

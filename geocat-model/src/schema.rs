use geocat_types::InfoType;
use serde::{Deserialize, Serialize};

/// Describes which properties of an entity type exist and which of them the
/// store can sort on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSchema {
    pub info_type: InfoType,
    pub properties: Vec<PropertyField>,
}

/// A queryable property of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyField {
    /// Dotted property path (e.g. "name", "workspace.id").
    pub path: String,
    pub field_type: FieldType,
    pub sortable: bool,
}

impl PropertyField {
    fn simple(path: &str, field_type: FieldType, sortable: bool) -> Self {
        Self {
            path: path.into(),
            field_type,
            sortable,
        }
    }

    /// Shorthand for a sortable text field.
    pub fn text(path: &str) -> Self {
        Self::simple(path, FieldType::Text, true)
    }

    /// Shorthand for a boolean field.
    pub fn bool(path: &str) -> Self {
        Self::simple(path, FieldType::Bool, true)
    }

    /// Shorthand for a reference id (`<property>.id`), sortable.
    pub fn reference(path: &str) -> Self {
        Self::simple(path, FieldType::Reference, true)
    }

    /// Shorthand for a collection; filterable but never sortable.
    pub fn list(path: &str) -> Self {
        Self::simple(path, FieldType::List, false)
    }
}

/// The data type of a queryable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Bool,
    Reference,
    List,
}

impl InfoSchema {
    /// The schema for one entity type.
    pub fn for_type(info_type: InfoType) -> Self {
        use PropertyField as P;
        let properties = match info_type {
            InfoType::Workspace => vec![P::text("id"), P::text("name"), P::bool("isolated")],
            InfoType::Namespace => vec![
                P::text("id"),
                P::text("prefix"),
                P::text("uri"),
                P::bool("isolated"),
            ],
            InfoType::Store => vec![
                P::text("id"),
                P::text("name"),
                P::text("description"),
                P::bool("enabled"),
                P::reference("workspace.id"),
                P::text("details.type"),
            ],
            InfoType::Resource => vec![
                P::text("id"),
                P::text("name"),
                P::text("nativeName"),
                P::text("title"),
                P::text("description"),
                P::bool("enabled"),
                P::list("keywords"),
                P::list("metadataLinks"),
                P::reference("store.id"),
                P::reference("namespace.id"),
                P::text("details.type"),
            ],
            InfoType::Layer => vec![
                P::text("id"),
                P::text("path"),
                P::bool("enabled"),
                P::reference("resource.id"),
                P::reference("defaultStyle.id"),
                P::list("styles.id"),
            ],
            InfoType::LayerGroup => vec![
                P::text("id"),
                P::text("name"),
                P::text("title"),
                P::text("mode"),
                P::reference("workspace.id"),
                P::list("layers.id"),
                P::list("styles.id"),
            ],
            InfoType::Style => vec![
                P::text("id"),
                P::text("name"),
                P::text("filename"),
                P::text("format"),
                P::reference("workspace.id"),
            ],
            InfoType::Map => vec![P::text("id"), P::text("name"), P::bool("enabled")],
        };
        Self {
            info_type,
            properties,
        }
    }

    pub fn field(&self, path: &str) -> Option<&PropertyField> {
        self.properties.iter().find(|f| f.path == path)
    }

    /// True if `path` names a sortable property of this type.
    pub fn can_sort(&self, path: &str) -> bool {
        self.field(path).is_some_and(|f| f.sortable)
    }
}

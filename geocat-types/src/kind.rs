use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage partition of a catalog entity.
///
/// Variant families (data stores and coverage stores, feature types and
/// coverages) share a partition; the variant is part of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InfoType {
    Workspace,
    Namespace,
    Store,
    Resource,
    Style,
    Layer,
    LayerGroup,
    Map,
}

impl InfoType {
    /// Every partition, in catalog dependency order.
    pub const ALL: [InfoType; 8] = [
        InfoType::Workspace,
        InfoType::Namespace,
        InfoType::Store,
        InfoType::Resource,
        InfoType::Style,
        InfoType::Layer,
        InfoType::LayerGroup,
        InfoType::Map,
    ];

    /// The stable type name used in ids and persisted rows.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            InfoType::Workspace => "WorkspaceInfo",
            InfoType::Namespace => "NamespaceInfo",
            InfoType::Store => "StoreInfo",
            InfoType::Resource => "ResourceInfo",
            InfoType::Style => "StyleInfo",
            InfoType::Layer => "LayerInfo",
            InfoType::LayerGroup => "LayerGroupInfo",
            InfoType::Map => "MapInfo",
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for InfoType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InfoType::ALL
            .into_iter()
            .find(|t| t.type_name() == s)
            .ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

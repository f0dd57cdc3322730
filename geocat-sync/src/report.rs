use geocat_model::InfoType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One step of a replication run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SyncStage {
    Workspaces,
    Namespaces,
    Stores,
    Resources,
    Styles,
    Layers,
    LayerGroups,
    Maps,
    DefaultWorkspace,
    DefaultNamespace,
    DefaultDataStores,
}

impl SyncStage {
    /// Entity stages in dependency order: everything an entity references is
    /// copied by an earlier stage.
    pub const ENTITIES: [SyncStage; 8] = [
        SyncStage::Workspaces,
        SyncStage::Namespaces,
        SyncStage::Stores,
        SyncStage::Resources,
        SyncStage::Styles,
        SyncStage::Layers,
        SyncStage::LayerGroups,
        SyncStage::Maps,
    ];

    /// The entity type a stage copies, or `None` for default-pointer stages.
    pub fn info_type(self) -> Option<InfoType> {
        match self {
            SyncStage::Workspaces => Some(InfoType::Workspace),
            SyncStage::Namespaces => Some(InfoType::Namespace),
            SyncStage::Stores => Some(InfoType::Store),
            SyncStage::Resources => Some(InfoType::Resource),
            SyncStage::Styles => Some(InfoType::Style),
            SyncStage::Layers => Some(InfoType::Layer),
            SyncStage::LayerGroups => Some(InfoType::LayerGroup),
            SyncStage::Maps => Some(InfoType::Map),
            SyncStage::DefaultWorkspace | SyncStage::DefaultNamespace | SyncStage::DefaultDataStores => None,
        }
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Workspaces => "workspaces",
            SyncStage::Namespaces => "namespaces",
            SyncStage::Stores => "stores",
            SyncStage::Resources => "resources",
            SyncStage::Styles => "styles",
            SyncStage::Layers => "layers",
            SyncStage::LayerGroups => "layer groups",
            SyncStage::Maps => "maps",
            SyncStage::DefaultWorkspace => "default workspace",
            SyncStage::DefaultNamespace => "default namespace",
            SyncStage::DefaultDataStores => "default data stores",
        };
        f.write_str(name)
    }
}

/// What a replication run copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Entities added to the target, per type.
    pub replicated: BTreeMap<InfoType, usize>,
    /// Entities already present in the target (by id) and left alone.
    pub skipped: BTreeMap<InfoType, usize>,
    /// Default pointers written to the target.
    pub defaults: usize,
    /// Stages that ran to completion.
    pub completed: Vec<SyncStage>,
}

impl SyncReport {
    pub fn replicated(&self, info_type: InfoType) -> usize {
        self.replicated.get(&info_type).copied().unwrap_or(0)
    }

    pub fn skipped(&self, info_type: InfoType) -> usize {
        self.skipped.get(&info_type).copied().unwrap_or(0)
    }

    pub fn total_replicated(&self) -> usize {
        self.replicated.values().sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.completed.last() == Some(&SyncStage::DefaultDataStores)
    }

    pub(crate) fn record_replicated(&mut self, info_type: InfoType) {
        *self.replicated.entry(info_type).or_default() += 1;
    }

    pub(crate) fn record_skipped(&mut self, info_type: InfoType) {
        *self.skipped.entry(info_type).or_default() += 1;
    }
}

use crate::{SyncError, SyncReport, SyncResult, SyncStage};
use geocat_facade::{CatalogError, CatalogFacade, CatalogResult};
use geocat_model::{CatalogId, CatalogInfo, LayerGroup};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// How entities already present in the target are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Every source entity is added. One whose id or natural key is already
    /// taken in the target interrupts the run.
    #[default]
    Strict,
    /// Entities whose id already exists in the target are skipped, so a
    /// re-run against a synced target copies nothing.
    SkipExisting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub mode: SyncMode,
}

impl SyncOptions {
    pub fn skip_existing() -> Self {
        Self {
            mode: SyncMode::SkipExisting,
        }
    }
}

/// Copies a whole catalog into another facade.
///
/// Entities are added in dependency order (workspaces, namespaces, stores,
/// resources, styles, layers, layer groups, maps) so each reference resolves
/// in the target when its holder is added. Ids are preserved. Default
/// pointers are copied last.
///
/// A run is not transactional: when a write fails the target keeps whatever
/// was already copied, and the returned [`SyncError::Interrupted`] says how
/// far the run got.
#[derive(Debug, Clone, Default)]
pub struct FacadeSynchronizer {
    options: SyncOptions,
}

impl FacadeSynchronizer {
    pub fn new(options: SyncOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn sync(&self, source: &CatalogFacade, target: &CatalogFacade) -> SyncResult<SyncReport> {
        if std::ptr::eq(source, target) {
            return Err(SyncError::SameCatalog);
        }
        info!(
            mode = ?self.options.mode,
            source = source.store().backend_name(),
            target = target.store().backend_name(),
            "catalog sync started"
        );
        let mut report = SyncReport::default();

        let workspaces = read(SyncStage::Workspaces, source.get_workspaces())?;
        self.copy(SyncStage::Workspaces, workspaces.clone(), target, &mut report)?;
        let namespaces = read(SyncStage::Namespaces, source.get_namespaces())?;
        self.copy(SyncStage::Namespaces, namespaces, target, &mut report)?;
        let stores = read(SyncStage::Stores, source.get_stores(None))?;
        self.copy(SyncStage::Stores, stores, target, &mut report)?;
        let resources = read(SyncStage::Resources, source.get_resources(None))?;
        self.copy(SyncStage::Resources, resources, target, &mut report)?;
        let styles = read(SyncStage::Styles, source.get_styles())?;
        self.copy(SyncStage::Styles, styles, target, &mut report)?;
        let layers = read(SyncStage::Layers, source.get_layers())?;
        self.copy(SyncStage::Layers, layers, target, &mut report)?;
        let groups = read(SyncStage::LayerGroups, source.get_layer_groups())?;
        self.copy(SyncStage::LayerGroups, nested_first(groups), target, &mut report)?;
        let maps = read(SyncStage::Maps, source.get_maps())?;
        self.copy(SyncStage::Maps, maps, target, &mut report)?;

        // The catalog-wide defaults are mirrored even when unset, so an unset
        // source default clears the target's.
        let stage = SyncStage::DefaultWorkspace;
        let workspace = read(stage, source.get_default_workspace())?;
        write(stage, &report, target.set_default_workspace(workspace.as_ref()))?;
        report.defaults += usize::from(workspace.is_some());
        report.completed.push(stage);

        let stage = SyncStage::DefaultNamespace;
        let namespace = read(stage, source.get_default_namespace())?;
        write(stage, &report, target.set_default_namespace(namespace.as_ref()))?;
        report.defaults += usize::from(namespace.is_some());
        report.completed.push(stage);

        let stage = SyncStage::DefaultDataStores;
        for ws in &workspaces {
            if let Some(store) = read(stage, source.get_default_data_store(ws))? {
                write(stage, &report, target.set_default_data_store(ws, Some(&store)))?;
                report.defaults += 1;
            }
        }
        report.completed.push(stage);

        info!(
            replicated = report.total_replicated(),
            skipped = report.total_skipped(),
            defaults = report.defaults,
            "catalog sync finished"
        );
        Ok(report)
    }

    fn copy<T: CatalogInfo>(
        &self,
        stage: SyncStage,
        infos: Vec<T>,
        target: &CatalogFacade,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        for info in infos {
            if self.options.mode == SyncMode::SkipExisting {
                let present = write(stage, report, exists_in(target, &info))?;
                if present {
                    debug!(%stage, label = %info.label(), "already in target, skipped");
                    report.record_skipped(T::TYPE);
                    continue;
                }
            }
            write(stage, report, target.add(info))?;
            report.record_replicated(T::TYPE);
        }
        report.completed.push(stage);
        debug!(
            %stage,
            replicated = report.replicated(T::TYPE),
            skipped = report.skipped(T::TYPE),
            "sync stage complete"
        );
        Ok(())
    }
}

/// Replicates a catalog into another with default options.
pub trait SyncTo {
    fn sync_to(&self, target: &CatalogFacade) -> SyncResult<SyncReport>;
}

impl SyncTo for CatalogFacade {
    fn sync_to(&self, target: &CatalogFacade) -> SyncResult<SyncReport> {
        FacadeSynchronizer::default().sync(self, target)
    }
}

fn exists_in<T: CatalogInfo>(target: &CatalogFacade, info: &T) -> CatalogResult<bool> {
    match info.id() {
        Some(id) => Ok(target.get::<T>(id)?.is_some()),
        None => Ok(false),
    }
}

fn read<R>(stage: SyncStage, result: CatalogResult<R>) -> SyncResult<R> {
    result.map_err(|source| SyncError::Source { stage, source })
}

fn write<R>(stage: SyncStage, report: &SyncReport, result: Result<R, CatalogError>) -> SyncResult<R> {
    result.map_err(|source| {
        warn!(%stage, error = %source, copied = report.total_replicated(), "catalog sync interrupted");
        SyncError::Interrupted {
            stage,
            report: report.clone(),
            source,
        }
    })
}

/// Orders layer groups so every nested group precedes the groups that
/// contain it. Source order is kept otherwise.
fn nested_first(groups: Vec<LayerGroup>) -> Vec<LayerGroup> {
    let known: HashSet<CatalogId> = groups.iter().filter_map(|g| g.id.clone()).collect();
    let mut placed: HashSet<CatalogId> = HashSet::new();
    let mut ordered = Vec::with_capacity(groups.len());
    let mut pending = groups;

    while !pending.is_empty() {
        let (ready, blocked): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|g| g.nested_groups().all(|id| placed.contains(id) || !known.contains(id)));
        if ready.is_empty() {
            // A cycle; the target rejects it when it is added.
            ordered.extend(blocked);
            break;
        }
        placed.extend(ready.iter().filter_map(|g| g.id.clone()));
        ordered.extend(ready);
        pending = blocked;
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocat_model::PublishedRef;

    fn group(name: &str) -> LayerGroup {
        let mut g = LayerGroup::new(name);
        g.id = Some(CatalogId::generate("LayerGroupInfo"));
        g
    }

    fn names(groups: &[LayerGroup]) -> Vec<&str> {
        groups.iter().filter_map(|g| g.name()).collect()
    }

    #[test]
    fn nested_groups_move_ahead_of_containers() {
        let inner = group("inner");
        let mut middle = group("middle");
        middle.push(PublishedRef::group(&inner).unwrap(), None);
        let mut outer = group("outer");
        outer.push(PublishedRef::group(&middle).unwrap(), None);
        let loose = group("loose");

        let ordered = nested_first(vec![outer, loose, middle, inner]);
        assert_eq!(names(&ordered), vec!["loose", "inner", "middle", "outer"]);
    }

    #[test]
    fn unknown_nested_ids_do_not_block() {
        let mut outer = group("outer");
        outer.push(PublishedRef::group(&group("elsewhere")).unwrap(), None);
        assert_eq!(names(&nested_first(vec![outer])), vec!["outer"]);
    }
}

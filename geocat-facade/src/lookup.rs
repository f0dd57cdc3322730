//! Typed lookups, all expressed as predicates over the entity store.

use crate::{CatalogError, CatalogFacade, CatalogResult, NamespaceScope, WorkspaceScope};
use geocat_model::{
    CatalogId, CatalogInfo, InfoType, Layer, LayerGroup, MapInfo, Namespace, Predicate, Query,
    Resource, ResourceKind, Store, StoreKind, Style, Workspace,
};

fn store_kind(kind: Option<StoreKind>) -> Predicate {
    kind.map(|k| Predicate::equal("details.type", k.tag()))
        .unwrap_or_default()
}

fn resource_kind(kind: Option<ResourceKind>) -> Predicate {
    kind.map(|k| Predicate::equal("details.type", k.tag()))
        .unwrap_or_default()
}

fn id_of<T: CatalogInfo>(info: &T) -> CatalogResult<&CatalogId> {
    info.id().ok_or(CatalogError::MissingId(T::TYPE))
}

impl CatalogFacade {
    // ── Workspaces ───────────────────────────────────────────────

    pub fn get_workspace(&self, id: &CatalogId) -> CatalogResult<Option<Workspace>> {
        self.get(id)
    }

    pub fn get_workspace_by_name(&self, name: &str) -> CatalogResult<Option<Workspace>> {
        self.find_unique(&Predicate::equal("name", name))
    }

    pub fn get_workspaces(&self) -> CatalogResult<Vec<Workspace>> {
        self.get_all()
    }

    // ── Namespaces ───────────────────────────────────────────────

    pub fn get_namespace(&self, id: &CatalogId) -> CatalogResult<Option<Namespace>> {
        self.get(id)
    }

    pub fn get_namespace_by_prefix(&self, prefix: &str) -> CatalogResult<Option<Namespace>> {
        self.find_unique(&Predicate::equal("prefix", prefix))
    }

    pub fn get_namespace_by_uri(&self, uri: &str) -> CatalogResult<Option<Namespace>> {
        self.find_unique(&Predicate::equal("uri", uri))
    }

    /// Every namespace with this uri. Isolated namespaces may share one.
    pub fn get_namespaces_by_uri(&self, uri: &str) -> CatalogResult<Vec<Namespace>> {
        self.list_as_vec(&Query::filter(Predicate::equal("uri", uri)))
    }

    pub fn get_namespaces(&self) -> CatalogResult<Vec<Namespace>> {
        self.get_all()
    }

    // ── Stores ───────────────────────────────────────────────────

    pub fn get_store(&self, id: &CatalogId) -> CatalogResult<Option<Store>> {
        self.get(id)
    }

    pub fn get_store_by_name(
        &self,
        workspace: WorkspaceScope<'_>,
        name: &str,
        kind: Option<StoreKind>,
    ) -> CatalogResult<Option<Store>> {
        let filter = workspace.predicate(self)?.map(|scope| {
            scope
                .and(Predicate::equal("name", name))
                .and(store_kind(kind))
        });
        self.find_unique_in(filter)
    }

    pub fn get_stores_by_workspace(
        &self,
        workspace: WorkspaceScope<'_>,
        kind: Option<StoreKind>,
    ) -> CatalogResult<Vec<Store>> {
        let filter = workspace.predicate(self)?.map(|scope| scope.and(store_kind(kind)));
        self.list_in(filter)
    }

    pub fn get_stores(&self, kind: Option<StoreKind>) -> CatalogResult<Vec<Store>> {
        self.list_as_vec(&Query::filter(store_kind(kind)))
    }

    // ── Resources ────────────────────────────────────────────────

    pub fn get_resource(&self, id: &CatalogId) -> CatalogResult<Option<Resource>> {
        self.get(id)
    }

    pub fn get_resource_by_name(
        &self,
        namespace: NamespaceScope<'_>,
        name: &str,
        kind: Option<ResourceKind>,
    ) -> CatalogResult<Option<Resource>> {
        let filter = namespace.predicate(self)?.map(|scope| {
            scope
                .and(Predicate::equal("name", name))
                .and(resource_kind(kind))
        });
        self.find_unique_in(filter)
    }

    pub fn get_resources(&self, kind: Option<ResourceKind>) -> CatalogResult<Vec<Resource>> {
        self.list_as_vec(&Query::filter(resource_kind(kind)))
    }

    pub fn get_resources_by_namespace(
        &self,
        namespace: NamespaceScope<'_>,
        kind: Option<ResourceKind>,
    ) -> CatalogResult<Vec<Resource>> {
        let filter = namespace.predicate(self)?.map(|scope| scope.and(resource_kind(kind)));
        self.list_in(filter)
    }

    /// The resource named `name` published from `store`. Ambiguous matches
    /// are reported, never silently resolved.
    pub fn get_resource_by_store(
        &self,
        store: &Store,
        name: &str,
        kind: Option<ResourceKind>,
    ) -> CatalogResult<Option<Resource>> {
        let filter = Predicate::equal("store.id", id_of(store)?)
            .and(Predicate::equal("name", name))
            .and(resource_kind(kind));
        self.find_unique(&filter)
    }

    pub fn get_resources_by_store(
        &self,
        store: &Store,
        kind: Option<ResourceKind>,
    ) -> CatalogResult<Vec<Resource>> {
        let filter = Predicate::equal("store.id", id_of(store)?).and(resource_kind(kind));
        self.list_as_vec(&Query::filter(filter))
    }

    // ── Layers ───────────────────────────────────────────────────

    pub fn get_layer(&self, id: &CatalogId) -> CatalogResult<Option<Layer>> {
        self.get(id)
    }

    /// Finds a layer by its effective name, the name of its resource.
    ///
    /// `prefix:name` restricts the search to the namespace with that prefix.
    /// A bare name is looked up in the default namespace first, then across
    /// all namespaces.
    pub fn get_layer_by_name(&self, name: &str) -> CatalogResult<Option<Layer>> {
        let resource = match name.split_once(':') {
            Some((prefix, local)) => match self.get_namespace_by_prefix(prefix)? {
                Some(ns) => self.get_resource_by_name(NamespaceScope::In(&ns), local, None)?,
                None => None,
            },
            None => match self.get_resource_by_name(NamespaceScope::Default, name, None)? {
                Some(resource) => Some(resource),
                None => self.get_resource_by_name(NamespaceScope::Any, name, None)?,
            },
        };
        match resource {
            Some(resource) => self.find_unique(&Predicate::equal("resource.id", id_of(&resource)?)),
            None => Ok(None),
        }
    }

    pub fn get_layers(&self) -> CatalogResult<Vec<Layer>> {
        self.get_all()
    }

    pub fn get_layers_by_resource(&self, resource: &Resource) -> CatalogResult<Vec<Layer>> {
        self.list_as_vec(&Query::filter(Predicate::equal("resource.id", id_of(resource)?)))
    }

    /// Layers using `style` as default style or as one of their alternates.
    pub fn get_layers_by_style(&self, style: &Style) -> CatalogResult<Vec<Layer>> {
        let id = id_of(style)?;
        let filter = Predicate::equal("defaultStyle.id", id).or(Predicate::equal("styles.id", id));
        self.list_as_vec(&Query::filter(filter))
    }

    /// A layer's effective name: its resource's name.
    pub fn layer_name(&self, layer: &Layer) -> CatalogResult<Option<String>> {
        let Some(resource_id) = layer.resource_id() else {
            return Ok(None);
        };
        Ok(self.get_resource(resource_id)?.and_then(|r| r.name))
    }

    /// `prefix:name`, qualified by the resource's namespace.
    pub fn prefixed_layer_name(&self, layer: &Layer) -> CatalogResult<Option<String>> {
        let Some(resource_id) = layer.resource_id() else {
            return Ok(None);
        };
        let Some(resource) = self.get_resource(resource_id)? else {
            return Ok(None);
        };
        let prefix = match resource.namespace_id() {
            Some(ns) => self.get_namespace(ns)?.and_then(|ns| ns.prefix),
            None => None,
        };
        Ok(match (prefix, resource.name) {
            (Some(prefix), Some(name)) => Some(format!("{prefix}:{name}")),
            (None, name) => name,
            (Some(_), None) => None,
        })
    }

    // ── Layer groups ─────────────────────────────────────────────

    pub fn get_layer_group(&self, id: &CatalogId) -> CatalogResult<Option<LayerGroup>> {
        self.get(id)
    }

    pub fn get_layer_group_by_name(
        &self,
        workspace: WorkspaceScope<'_>,
        name: &str,
    ) -> CatalogResult<Option<LayerGroup>> {
        let filter = workspace
            .predicate(self)?
            .map(|scope| scope.and(Predicate::equal("name", name)));
        self.find_unique_in(filter)
    }

    pub fn get_layer_groups(&self) -> CatalogResult<Vec<LayerGroup>> {
        self.get_all()
    }

    pub fn get_layer_groups_by_workspace(&self, workspace: WorkspaceScope<'_>) -> CatalogResult<Vec<LayerGroup>> {
        let filter = workspace.predicate(self)?;
        self.list_in(filter)
    }

    // ── Styles ───────────────────────────────────────────────────

    pub fn get_style(&self, id: &CatalogId) -> CatalogResult<Option<Style>> {
        self.get(id)
    }

    pub fn get_style_by_name(&self, workspace: WorkspaceScope<'_>, name: &str) -> CatalogResult<Option<Style>> {
        let filter = workspace
            .predicate(self)?
            .map(|scope| scope.and(Predicate::equal("name", name)));
        self.find_unique_in(filter)
    }

    pub fn get_styles(&self) -> CatalogResult<Vec<Style>> {
        self.get_all()
    }

    pub fn get_styles_by_workspace(&self, workspace: WorkspaceScope<'_>) -> CatalogResult<Vec<Style>> {
        let filter = workspace.predicate(self)?;
        self.list_in(filter)
    }

    // ── Maps ─────────────────────────────────────────────────────

    pub fn get_map(&self, id: &CatalogId) -> CatalogResult<Option<MapInfo>> {
        self.get(id)
    }

    pub fn get_map_by_name(&self, name: &str) -> CatalogResult<Option<MapInfo>> {
        self.find_unique(&Predicate::equal("name", name))
    }

    pub fn get_maps(&self) -> CatalogResult<Vec<MapInfo>> {
        self.get_all()
    }

    /// Number of entities of each type, in dependency order.
    pub fn counts(&self) -> CatalogResult<Vec<(InfoType, usize)>> {
        InfoType::ALL
            .into_iter()
            .map(|t| Ok((t, self.store.count_type(t, &Predicate::AcceptAll)?)))
            .collect()
    }
}

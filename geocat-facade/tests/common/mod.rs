//! Shared test helpers for facade tests.

#![allow(dead_code)]

use geocat_facade::{AddEvent, CatalogFacade, CatalogListener, ModifyEvent, RemoveEvent};
use geocat_model::{Layer, Namespace, Resource, Store, Style, Workspace};
use parking_lot::Mutex;
use std::sync::Once;

/// Routes `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn facade() -> CatalogFacade {
    init_tracing();
    CatalogFacade::in_memory()
}

// ── Recording listener ───────────────────────────────────────────

/// Records every notification as a short string, and can veto modifications.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<String>>,
    veto: Mutex<Option<String>>,
}

impl RecordingListener {
    pub fn vetoing(reason: &str) -> Self {
        let listener = Self::default();
        *listener.veto.lock() = Some(reason.to_string());
        listener
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl CatalogListener for RecordingListener {
    fn handle_add(&self, event: &AddEvent) {
        self.events.lock().push(format!("add {}", event.source.info_type));
    }

    fn handle_modify(&self, event: &ModifyEvent) -> Result<(), String> {
        self.events
            .lock()
            .push(format!("modify {}", event.changes.property_names().join(",")));
        match self.veto.lock().clone() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    fn handle_post_modify(&self, event: &ModifyEvent) {
        self.events
            .lock()
            .push(format!("post_modify {}", event.changes.property_names().join(",")));
    }

    fn handle_remove(&self, event: &RemoveEvent) {
        self.events.lock().push(format!("remove {:?}", event.subject));
    }
}

// ── Fixtures ─────────────────────────────────────────────────────

pub fn add_workspace(facade: &CatalogFacade, name: &str) -> Workspace {
    facade.add(Workspace::new(name)).unwrap()
}

pub fn add_namespace(facade: &CatalogFacade, prefix: &str) -> Namespace {
    facade
        .add(Namespace::new(prefix, format!("http://{prefix}.org")))
        .unwrap()
}

pub fn add_data_store(facade: &CatalogFacade, name: &str, ws: &Workspace) -> Store {
    facade.add(Store::data_store(name, ws)).unwrap()
}

pub fn add_feature_type(facade: &CatalogFacade, name: &str, ds: &Store, ns: &Namespace) -> Resource {
    facade.add(Resource::feature_type(name, ds, ns)).unwrap()
}

pub fn add_style(facade: &CatalogFacade, name: &str) -> Style {
    facade.add(Style::new(name, format!("{name}.sld"))).unwrap()
}

pub fn add_layer(facade: &CatalogFacade, resource: &Resource, style: &Style) -> Layer {
    let mut layer = Layer::new(resource);
    layer.default_style = geocat_model::InfoRef::to(style);
    facade.add(layer).unwrap()
}

/// Workspace, namespace, data store, feature type, style and layer, all
/// named after `name`.
pub struct Published {
    pub workspace: Workspace,
    pub namespace: Namespace,
    pub store: Store,
    pub resource: Resource,
    pub style: Style,
    pub layer: Layer,
}

pub fn publish(facade: &CatalogFacade, name: &str) -> Published {
    let workspace = add_workspace(facade, name);
    let namespace = add_namespace(facade, name);
    let store = add_data_store(facade, &format!("{name}_store"), &workspace);
    let resource = add_feature_type(facade, &format!("{name}_roads"), &store, &namespace);
    let style = add_style(facade, &format!("{name}_line"));
    let layer = add_layer(facade, &resource, &style);
    Published {
        workspace,
        namespace,
        store,
        resource,
        style,
        layer,
    }
}

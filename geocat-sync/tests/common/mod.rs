//! Shared test helpers for sync tests.

#![allow(dead_code)]

use geocat_facade::CatalogFacade;
use geocat_model::{
    InfoRef, Layer, LayerGroup, MapInfo, Namespace, PublishedRef, Resource, Store, Style, Workspace,
};
use std::sync::Once;

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Two workspaces, each with a namespace, data store, coverage store, two
/// resources, a workspace style, a layer and a group; plus a global style,
/// a nested group, a map and every default pointer set.
pub fn populated_catalog() -> CatalogFacade {
    init_tracing();
    let catalog = CatalogFacade::in_memory();
    let global_style = catalog.add(Style::new("point", "point.sld")).unwrap();

    let mut groups = Vec::new();
    for name in ["acme", "bam"] {
        let ws = catalog.add(Workspace::new(name)).unwrap();
        let ns = catalog
            .add(Namespace::new(name, format!("http://{name}.org")))
            .unwrap();
        let ds = catalog.add(Store::data_store(format!("{name}_db"), &ws)).unwrap();
        let cs = catalog.add(Store::coverage_store(format!("{name}_dem"), &ws)).unwrap();
        let roads = catalog
            .add(Resource::feature_type("roads", &ds, &ns))
            .unwrap();
        catalog
            .add(Resource::coverage("elevation", &cs, &ns))
            .unwrap();
        let style = catalog
            .add(Style::in_workspace("line", "line.sld", &ws))
            .unwrap();

        let mut layer = Layer::new(&roads);
        layer.default_style = InfoRef::to(&style);
        layer.styles.insert(InfoRef::to(&global_style).unwrap());
        let layer = catalog.add(layer).unwrap();

        let mut group = LayerGroup::new("base");
        group.workspace = InfoRef::to(&ws);
        group.push(PublishedRef::layer(&layer).unwrap(), InfoRef::to(&style));
        groups.push(catalog.add(group).unwrap());

        catalog.set_default_data_store(&ws, Some(&ds)).unwrap();
        if name == "bam" {
            catalog.set_default_workspace(Some(&ws)).unwrap();
            catalog.set_default_namespace(Some(&ns)).unwrap();
        }
    }

    let mut all = LayerGroup::new("all");
    for g in &groups {
        all.push(PublishedRef::group(g).unwrap(), None);
    }
    catalog.add(all).unwrap();
    catalog.add(MapInfo::new("overview")).unwrap();
    catalog
}

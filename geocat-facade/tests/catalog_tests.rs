mod common;

use common::*;
use geocat_facade::{CatalogError, NamespaceScope, WorkspaceScope};
use geocat_model::{
    InfoRef, InfoType, Layer, LayerGroup, MapInfo, Namespace, Predicate, PublishedRef,
    Query, Resource, ResourceKind, SortBy, Store, StoreKind, Style, Tracked, Workspace,
};
use pretty_assertions::assert_eq;

// ── Round trips ──────────────────────────────────────────────────

#[test]
fn add_assigns_id_and_get_returns_equal_entity() {
    let facade = facade();
    let p = publish(&facade, "acme");

    assert!(p.workspace.id.is_some());
    assert_eq!(facade.get_workspace(p.workspace.id.as_ref().unwrap()).unwrap(), Some(p.workspace.clone()));
    assert_eq!(facade.get_namespace(p.namespace.id.as_ref().unwrap()).unwrap(), Some(p.namespace.clone()));
    assert_eq!(facade.get_store(p.store.id.as_ref().unwrap()).unwrap(), Some(p.store.clone()));
    assert_eq!(facade.get_resource(p.resource.id.as_ref().unwrap()).unwrap(), Some(p.resource.clone()));
    assert_eq!(facade.get_style(p.style.id.as_ref().unwrap()).unwrap(), Some(p.style.clone()));
    assert_eq!(facade.get_layer(p.layer.id.as_ref().unwrap()).unwrap(), Some(p.layer.clone()));

    let map = facade.add(MapInfo::new("overview")).unwrap();
    assert_eq!(facade.get_map(map.id.as_ref().unwrap()).unwrap(), Some(map.clone()));
    assert_eq!(facade.get_map_by_name("overview").unwrap(), Some(map));
}

#[test]
fn added_ids_carry_type_prefix() {
    let facade = facade();
    let ws = add_workspace(&facade, "acme");
    let cs = facade.add(Store::coverage_store("dem", &ws)).unwrap();
    assert_eq!(ws.id.as_ref().unwrap().prefix(), Some("WorkspaceInfo"));
    assert_eq!(cs.id.as_ref().unwrap().prefix(), Some("CoverageStoreInfo"));
}

#[test]
fn remove_makes_lookups_absent() {
    let facade = facade();
    let ws = add_workspace(&facade, "acme");
    let map = facade.add(MapInfo::new("overview")).unwrap();

    facade.remove(&map).unwrap();
    facade.remove(&ws).unwrap();

    assert_eq!(facade.get_workspace(ws.id.as_ref().unwrap()).unwrap(), None);
    assert_eq!(facade.get_workspace_by_name("acme").unwrap(), None);
    assert_eq!(facade.get_map_by_name("overview").unwrap(), None);
}

#[test]
fn remove_by_id_dispatches_on_type() {
    let facade = facade();
    let style = add_style(&facade, "line");
    facade.remove_by_id(InfoType::Style, style.id.as_ref().unwrap()).unwrap();
    assert!(facade.get_styles().unwrap().is_empty());
}

#[test]
fn remove_of_unsaved_entity_is_noop() {
    let facade = facade();
    facade.remove(&Workspace::new("never-added")).unwrap();
}

#[test]
fn add_rejects_missing_name() {
    let facade = facade();
    let err = facade.add(Workspace::default()).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(err.is_client_error());
    assert!(facade.get_workspaces().unwrap().is_empty());
}

#[test]
fn add_rejects_duplicate_name_in_scope() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let bam = add_workspace(&facade, "bam");
    add_data_store(&facade, "roads", &acme);

    let err = facade.add(Store::data_store("roads", &acme)).unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate { info_type: InfoType::Store, .. }));

    add_data_store(&facade, "roads", &bam);
    assert_eq!(facade.get_stores(None).unwrap().len(), 2);
}

// ── Workspace defaults ───────────────────────────────────────────

#[test]
fn default_workspace_scenario() {
    let facade = facade();
    add_workspace(&facade, "acme");
    assert_eq!(facade.get_workspaces().unwrap().len(), 1);

    let bam = add_workspace(&facade, "bam");
    facade.set_default_workspace(Some(&bam)).unwrap();
    let default = facade.get_default_workspace().unwrap().unwrap();
    assert_eq!(default.name(), Some("bam"));

    facade.set_default_workspace(None).unwrap();
    assert_eq!(facade.get_default_workspace().unwrap(), None);
}

#[test]
fn default_namespace_set_and_clear() {
    let facade = facade();
    let ns = add_namespace(&facade, "topp");
    assert_eq!(facade.get_default_namespace().unwrap(), None);

    facade.set_default_namespace(Some(&ns)).unwrap();
    assert_eq!(facade.get_default_namespace().unwrap(), Some(ns));

    facade.set_default_namespace(None).unwrap();
    assert_eq!(facade.get_default_namespace().unwrap(), None);
}

#[test]
fn default_data_store_is_per_workspace() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let bam = add_workspace(&facade, "bam");
    let roads = add_data_store(&facade, "roads", &acme);
    let rivers = add_data_store(&facade, "rivers", &bam);

    facade.set_default_data_store(&acme, Some(&roads)).unwrap();
    facade.set_default_data_store(&bam, Some(&rivers)).unwrap();

    assert_eq!(facade.get_default_data_store(&acme).unwrap(), Some(roads));
    assert_eq!(facade.get_default_data_store(&bam).unwrap(), Some(rivers));
}

#[test]
fn default_data_store_must_be_data_store_of_that_workspace() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let bam = add_workspace(&facade, "bam");
    let dem = facade.add(Store::coverage_store("dem", &acme)).unwrap();
    let rivers = add_data_store(&facade, "rivers", &bam);

    let err = facade.set_default_data_store(&acme, Some(&dem)).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    let err = facade.set_default_data_store(&acme, Some(&rivers)).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(facade.get_default_data_store(&acme).unwrap(), None);
}

#[test]
fn set_default_requires_persisted_entity() {
    let facade = facade();
    let err = facade.set_default_workspace(Some(&Workspace::new("floating"))).unwrap_err();
    assert!(matches!(err, CatalogError::MissingId(InfoType::Workspace)));
}

// ── Save ─────────────────────────────────────────────────────────

#[test]
fn rename_store_moves_name_lookup() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let widgets = add_data_store(&facade, "widgets", &acme);

    let mut tracked = Tracked::new(widgets.clone());
    tracked.modify(|s| s.name = Some("foo".into())).unwrap();
    let saved = facade.save(&mut tracked).unwrap();

    assert_eq!(saved.name(), Some("foo"));
    assert!(!tracked.is_dirty());
    let ws = WorkspaceScope::In(&acme);
    assert_eq!(facade.get_store_by_name(ws, "widgets", None).unwrap(), None);
    let found = facade.get_store_by_name(ws, "foo", None).unwrap().unwrap();
    assert_eq!(found.id, widgets.id);
}

#[test]
fn failed_save_leaves_stored_state_intact() {
    let facade = facade();
    let ns = add_namespace(&facade, "topp");

    let mut tracked = Tracked::new(ns.clone());
    tracked.modify(|n| n.prefix = None).unwrap();
    let err = facade.save(&mut tracked).unwrap_err();

    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(facade.get_namespace_by_prefix("topp").unwrap(), Some(ns.clone()));
    // The wrapper is reverted to what is stored.
    assert!(!tracked.is_dirty());
    assert_eq!(tracked.get(), &ns);
}

#[test]
fn save_into_taken_name_is_duplicate() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    add_data_store(&facade, "roads", &acme);
    let rivers = add_data_store(&facade, "rivers", &acme);

    let mut tracked = Tracked::new(rivers);
    tracked.modify(|s| s.name = Some("roads".into())).unwrap();
    let err = facade.save(&mut tracked).unwrap_err();

    assert!(matches!(err, CatalogError::Duplicate { .. }));
    let ws = WorkspaceScope::In(&acme);
    assert!(facade.get_store_by_name(ws, "rivers", None).unwrap().is_some());
}

#[test]
fn save_requires_id() {
    let facade = facade();
    let mut tracked = Tracked::new(Workspace::new("floating"));
    tracked.modify(|w| w.isolated = true).unwrap();
    let err = facade.save(&mut tracked).unwrap_err();
    assert!(matches!(err, CatalogError::MissingId(InfoType::Workspace)));
}

#[test]
fn save_of_removed_entity_is_not_found() {
    let facade = facade();
    let style = add_style(&facade, "line");
    facade.remove(&style).unwrap();

    let mut tracked = Tracked::new(style);
    tracked.modify(|s| s.format = Some("mbstyle".into())).unwrap();
    let err = facade.save(&mut tracked).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { info_type: InfoType::Style, .. }));
}

#[test]
fn stale_wrapper_save_keeps_other_committed_fields() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let store = add_data_store(&facade, "roads", &acme);

    let mut described = Tracked::new(store.clone());
    let mut renamed = Tracked::new(store);
    described.modify(|s| s.description = Some("desc".into())).unwrap();
    renamed.modify(|s| s.name = Some("foo".into())).unwrap();

    facade.save(&mut described).unwrap();
    let saved = facade.save(&mut renamed).unwrap();

    assert_eq!(saved.name(), Some("foo"));
    assert_eq!(saved.description.as_deref(), Some("desc"));
    let stored: Store = facade.get(saved.id.as_ref().unwrap()).unwrap().unwrap();
    assert_eq!(stored, saved);
    assert_eq!(renamed.get(), &stored);
    assert!(!renamed.is_dirty());
}

#[test]
fn save_through_set_property() {
    let facade = facade();
    let ws = add_workspace(&facade, "acme");

    let mut tracked = Tracked::new(ws.clone());
    tracked.set_property("name", "acme2").unwrap();
    facade.save(&mut tracked).unwrap();

    assert_eq!(facade.get_workspace_by_name("acme").unwrap(), None);
    assert_eq!(facade.get_workspace_by_name("acme2").unwrap().unwrap().id, ws.id);
}

// ── Lookups ──────────────────────────────────────────────────────

#[test]
fn store_lookups_narrow_by_kind_and_scope() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let bam = add_workspace(&facade, "bam");
    add_data_store(&facade, "roads", &acme);
    facade.add(Store::coverage_store("dem", &acme)).unwrap();
    add_data_store(&facade, "rivers", &bam);

    assert_eq!(facade.get_stores(None).unwrap().len(), 3);
    assert_eq!(facade.get_stores(Some(StoreKind::DataStore)).unwrap().len(), 2);
    assert_eq!(facade.get_stores(Some(StoreKind::CoverageStore)).unwrap().len(), 1);

    let in_acme = facade.get_stores_by_workspace(WorkspaceScope::In(&acme), None).unwrap();
    assert_eq!(in_acme.len(), 2);
    let data_in_acme = facade
        .get_stores_by_workspace(WorkspaceScope::In(&acme), Some(StoreKind::DataStore))
        .unwrap();
    assert_eq!(data_in_acme.len(), 1);

    assert!(facade
        .get_store_by_name(WorkspaceScope::In(&acme), "dem", Some(StoreKind::DataStore))
        .unwrap()
        .is_none());
    assert!(facade
        .get_store_by_name(WorkspaceScope::In(&acme), "dem", Some(StoreKind::CoverageStore))
        .unwrap()
        .is_some());
}

#[test]
fn default_workspace_scope_follows_pointer() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let bam = add_workspace(&facade, "bam");
    add_data_store(&facade, "roads", &acme);
    add_data_store(&facade, "rivers", &bam);

    // No default: the scope matches nothing.
    assert!(facade.get_stores_by_workspace(WorkspaceScope::Default, None).unwrap().is_empty());

    facade.set_default_workspace(Some(&bam)).unwrap();
    let stores = facade.get_stores_by_workspace(WorkspaceScope::Default, None).unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].name(), Some("rivers"));
}

#[test]
fn global_scope_matches_entities_without_workspace() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    facade.add(Style::new("line", "line.sld")).unwrap();
    facade.add(Style::in_workspace("line", "acme_line.sld", &acme)).unwrap();

    let global = facade.get_style_by_name(WorkspaceScope::Global, "line").unwrap().unwrap();
    assert_eq!(global.filename.as_deref(), Some("line.sld"));
    let scoped = facade.get_style_by_name(WorkspaceScope::In(&acme), "line").unwrap().unwrap();
    assert_eq!(scoped.filename.as_deref(), Some("acme_line.sld"));

    let err = facade.get_style_by_name(WorkspaceScope::Any, "line").unwrap_err();
    assert!(matches!(err, CatalogError::Ambiguous { info_type: InfoType::Style, .. }));

    assert_eq!(facade.get_styles_by_workspace(WorkspaceScope::Global).unwrap().len(), 1);
    assert_eq!(facade.get_styles().unwrap().len(), 2);
}

#[test]
fn namespace_lookups() {
    let facade = facade();
    let topp = add_namespace(&facade, "topp");
    let mut isolated = Namespace::new("topp_iso", "http://topp.org");
    isolated.isolated = true;
    facade.add(isolated).unwrap();

    assert_eq!(facade.get_namespace_by_prefix("topp").unwrap(), Some(topp));
    assert_eq!(facade.get_namespaces_by_uri("http://topp.org").unwrap().len(), 2);
    assert!(matches!(
        facade.get_namespace_by_uri("http://topp.org").unwrap_err(),
        CatalogError::Ambiguous { .. }
    ));
    assert_eq!(facade.get_namespaces().unwrap().len(), 2);
}

#[test]
fn resource_lookups() {
    let facade = facade();
    let p = publish(&facade, "acme");
    let coverage = facade
        .add(Resource::coverage("elevation", &p.store, &p.namespace))
        .unwrap();

    let by_store = facade.get_resources_by_store(&p.store, None).unwrap();
    assert_eq!(by_store.len(), 2);
    assert_eq!(
        facade.get_resources(Some(ResourceKind::Coverage)).unwrap(),
        vec![coverage.clone()]
    );
    assert_eq!(
        facade
            .get_resource_by_store(&p.store, "elevation", None)
            .unwrap(),
        Some(coverage.clone())
    );
    assert_eq!(
        facade
            .get_resource_by_store(&p.store, "elevation", Some(ResourceKind::FeatureType))
            .unwrap(),
        None
    );
    let in_ns = facade
        .get_resources_by_namespace(NamespaceScope::In(&p.namespace), Some(ResourceKind::FeatureType))
        .unwrap();
    assert_eq!(in_ns, vec![p.resource.clone()]);
    assert_eq!(
        facade
            .get_resource_by_name(NamespaceScope::Any, "acme_roads", None)
            .unwrap(),
        Some(p.resource)
    );
}

#[test]
fn layer_lookup_by_plain_and_prefixed_name() {
    let facade = facade();
    let acme = publish(&facade, "acme");
    let bam = publish(&facade, "bam");

    let found = facade.get_layer_by_name("acme:acme_roads").unwrap();
    assert_eq!(found, Some(acme.layer.clone()));
    assert_eq!(facade.get_layer_by_name("bam:acme_roads").unwrap(), None);
    assert_eq!(facade.get_layer_by_name("nope:acme_roads").unwrap(), None);

    // A bare name falls back to a search across all namespaces.
    assert_eq!(facade.get_layer_by_name("bam_roads").unwrap(), Some(bam.layer.clone()));

    assert_eq!(facade.layer_name(&acme.layer).unwrap().as_deref(), Some("acme_roads"));
    assert_eq!(
        facade.prefixed_layer_name(&bam.layer).unwrap().as_deref(),
        Some("bam:bam_roads")
    );
}

#[test]
fn bare_layer_name_prefers_default_namespace() {
    let facade = facade();
    let ws = add_workspace(&facade, "acme");
    let store = add_data_store(&facade, "db", &ws);
    let style = add_style(&facade, "line");
    let first = add_namespace(&facade, "first");
    let second = add_namespace(&facade, "second");
    let in_first = add_feature_type(&facade, "roads", &store, &first);
    let in_second = facade
        .add(Resource::feature_type("roads", &store, &second))
        .unwrap();
    add_layer(&facade, &in_first, &style);
    let second_layer = add_layer(&facade, &in_second, &style);

    assert!(matches!(
        facade.get_layer_by_name("roads").unwrap_err(),
        CatalogError::Ambiguous { .. }
    ));

    facade.set_default_namespace(Some(&second)).unwrap();
    assert_eq!(facade.get_layer_by_name("roads").unwrap(), Some(second_layer));
}

#[test]
fn layers_by_style_match_default_or_listed() {
    let facade = facade();
    let p = publish(&facade, "acme");
    let alt = add_style(&facade, "alt");
    let other = add_feature_type(&facade, "rivers", &p.store, &p.namespace);
    let mut layer = Layer::new(&other);
    layer.default_style = InfoRef::to(&p.style);
    layer.styles.insert(InfoRef::to(&alt).unwrap());
    let second = facade.add(layer).unwrap();

    assert_eq!(facade.get_layers_by_style(&p.style).unwrap().len(), 2);
    assert_eq!(facade.get_layers_by_style(&alt).unwrap(), vec![second]);
    assert_eq!(facade.get_layers_by_resource(&p.resource).unwrap(), vec![p.layer]);
}

#[test]
fn layer_group_lookups() {
    let facade = facade();
    let p = publish(&facade, "acme");
    let mut group = LayerGroup::new("base");
    group.workspace = InfoRef::to(&p.workspace);
    group.push(PublishedRef::layer(&p.layer).unwrap(), None);
    let group = facade.add(group).unwrap();

    let found = facade
        .get_layer_group_by_name(WorkspaceScope::In(&p.workspace), "base")
        .unwrap();
    assert_eq!(found, Some(group.clone()));
    assert_eq!(
        facade.get_layer_group_by_name(WorkspaceScope::Global, "base").unwrap(),
        None
    );
    assert_eq!(
        facade
            .get_layer_groups_by_workspace(WorkspaceScope::In(&p.workspace))
            .unwrap()
            .len(),
        1
    );
    assert_eq!(facade.get_layer_groups().unwrap(), vec![group]);
}

// ── Listing ──────────────────────────────────────────────────────

#[test]
fn list_sorts_paginates_and_counts() {
    let facade = facade();
    for name in ["delta", "alpha", "charlie", "bravo"] {
        add_workspace(&facade, name);
    }

    let query = Query::all().sort(SortBy::asc("name")).offset(1).limit(2);
    let names: Vec<String> = facade
        .list_as_vec::<Workspace>(&query)
        .unwrap()
        .into_iter()
        .filter_map(|w| w.name)
        .collect();
    assert_eq!(names, vec!["bravo".to_string(), "charlie".to_string()]);

    assert_eq!(facade.count::<Workspace>(&Predicate::AcceptAll).unwrap(), 4);
    assert_eq!(facade.count::<Workspace>(&Predicate::equal("name", "alpha")).unwrap(), 1);
}

#[test]
fn list_rejects_unsortable_property() {
    let facade = facade();
    assert!(facade.can_sort::<Workspace>("name"));
    assert!(!facade.can_sort::<Resource>("keywords"));

    let err = facade
        .list::<Resource>(&Query::all().sort(SortBy::asc("keywords")))
        .err()
        .unwrap();
    assert!(matches!(err, CatalogError::UnsupportedSort { .. }));
}

#[test]
fn list_cursor_is_released_on_drop() {
    let facade = facade();
    add_workspace(&facade, "acme");
    add_workspace(&facade, "bam");

    let mut cursor = facade.list::<Workspace>(&Query::all()).unwrap();
    assert_eq!(facade.store().open_cursors(), 1);
    let first = cursor.next().unwrap().unwrap();
    assert_eq!(first.name(), Some("acme"));
    drop(cursor);
    assert_eq!(facade.store().open_cursors(), 0);
}

#[test]
fn get_by_identity_matches_all_pairs() {
    let facade = facade();
    let acme = add_workspace(&facade, "acme");
    let roads = add_data_store(&facade, "roads", &acme);

    let found: Option<Store> = facade
        .get_by_identity(&[
            ("workspace.id", acme.id.clone().unwrap().into()),
            ("name", "roads".into()),
        ])
        .unwrap();
    assert_eq!(found, Some(roads));
}

#[test]
fn counts_cover_every_type() {
    let facade = facade();
    publish(&facade, "acme");
    let counts = facade.counts().unwrap();
    assert_eq!(counts.len(), InfoType::ALL.len());
    assert!(counts.iter().any(|(t, n)| *t == InfoType::Layer && *n == 1));
    assert!(counts.iter().any(|(t, n)| *t == InfoType::Map && *n == 0));
}

#[test]
fn dispose_drops_contents() {
    let facade = facade();
    add_workspace(&facade, "acme");
    facade.dispose().unwrap();
    assert!(facade.get_workspaces().unwrap().is_empty());
}

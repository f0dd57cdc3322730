//! Shared test helpers for storage tests.

#![allow(dead_code)]

use geocat_model::{Namespace, Resource, Store, Style, Workspace};
use geocat_storage::{EntityStore, SqliteBackend};
use std::sync::Arc;
use tempfile::TempDir;

/// A store plus whatever must outlive it (the temp dir of a SQLite file).
pub struct Fixture {
    pub store: EntityStore,
    _dir: Option<TempDir>,
}

pub fn memory_store() -> Fixture {
    Fixture {
        store: EntityStore::open_in_memory(),
        _dir: None,
    }
}

pub fn sqlite_store() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = EntityStore::open(dir.path().join("catalog.db")).unwrap();
    Fixture {
        store,
        _dir: Some(dir),
    }
}

pub fn sqlite_memory_store() -> Fixture {
    Fixture {
        store: EntityStore::new(Arc::new(SqliteBackend::open_in_memory().unwrap())),
        _dir: None,
    }
}

pub fn add_workspace(store: &EntityStore, name: &str) -> Workspace {
    store.add(Workspace::new(name)).unwrap()
}

pub fn add_namespace(store: &EntityStore, prefix: &str) -> Namespace {
    store
        .add(Namespace::new(prefix, format!("http://{prefix}.org")))
        .unwrap()
}

pub fn add_data_store(store: &EntityStore, name: &str, ws: &Workspace) -> Store {
    store.add(Store::data_store(name, ws)).unwrap()
}

pub fn add_feature_type(store: &EntityStore, name: &str, ds: &Store, ns: &Namespace) -> Resource {
    store.add(Resource::feature_type(name, ds, ns)).unwrap()
}

pub fn add_style(store: &EntityStore, name: &str) -> Style {
    store.add(Style::new(name, format!("{name}.sld"))).unwrap()
}

//! Default pointers: default workspace, default namespace and one default
//! data store per workspace.
//!
//! Pointers live in the store's keyed registry, not on any entity. Changing
//! one runs the same pre/post-modify envelope as an entity save, with the
//! catalog itself as the subject.

use crate::events::{EventSubject, ModifyEvent};
use crate::{CatalogError, CatalogFacade, CatalogResult};
use geocat_model::{CatalogId, CatalogInfo, ChangeSet, InfoType, ModelError, Namespace, Store, Workspace};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_WORKSPACE_KEY: &str = "WorkspaceInfo";
pub const DEFAULT_NAMESPACE_KEY: &str = "NamespaceInfo";

/// Registry key of a workspace's default data store.
pub fn default_store_key(workspace: &CatalogId) -> String {
    format!("WorkspaceInfo.{workspace}")
}

fn id_value(id: Option<&CatalogId>) -> Value {
    id.map(Value::from).unwrap_or(Value::Null)
}

impl CatalogFacade {
    pub fn get_default_workspace(&self) -> CatalogResult<Option<Workspace>> {
        self.resolve_default(DEFAULT_WORKSPACE_KEY)
    }

    /// Sets or, with `None`, clears the default workspace.
    pub fn set_default_workspace(&self, workspace: Option<&Workspace>) -> CatalogResult<()> {
        let id = workspace.map(required_id).transpose()?;
        self.swap_default(DEFAULT_WORKSPACE_KEY, "defaultWorkspace", id)
    }

    pub fn get_default_namespace(&self) -> CatalogResult<Option<Namespace>> {
        self.resolve_default(DEFAULT_NAMESPACE_KEY)
    }

    pub fn set_default_namespace(&self, namespace: Option<&Namespace>) -> CatalogResult<()> {
        let id = namespace.map(required_id).transpose()?;
        self.swap_default(DEFAULT_NAMESPACE_KEY, "defaultNamespace", id)
    }

    pub fn get_default_data_store(&self, workspace: &Workspace) -> CatalogResult<Option<Store>> {
        let ws = required_id(workspace)?;
        self.resolve_default(&default_store_key(ws))
    }

    /// Sets or clears the default data store of `workspace`.
    ///
    /// The store must be a data store that belongs to the workspace.
    pub fn set_default_data_store(&self, workspace: &Workspace, store: Option<&Store>) -> CatalogResult<()> {
        let ws = required_id(workspace)?;
        let id = match store {
            Some(store) => {
                if !store.is_data_store() {
                    return Err(invalid_store(format!(
                        "{} is a {}, not a data store",
                        store.label(),
                        store.kind()
                    )));
                }
                if store.workspace_id() != Some(ws) {
                    return Err(invalid_store(format!(
                        "{} does not belong to workspace {}",
                        store.label(),
                        workspace.label()
                    )));
                }
                Some(required_id(store)?)
            }
            None => None,
        };
        self.swap_default(&default_store_key(ws), "defaultDataStore", id)
    }

    /// The entity a pointer names, or `None` if unset or dangling.
    fn resolve_default<T: CatalogInfo>(&self, key: &str) -> CatalogResult<Option<T>> {
        match self.store.get_default(key)? {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    fn swap_default(&self, key: &str, property: &str, new: Option<&CatalogId>) -> CatalogResult<()> {
        let _guard = self.lock_writes();
        let old = self.store.get_default(key)?;
        if old.as_ref() == new {
            return Ok(());
        }
        let event = ModifyEvent {
            subject: EventSubject::Catalog,
            changes: ChangeSet::single(property, id_value(old.as_ref()), id_value(new)),
        };
        self.events().fire_modify(&event)?;
        self.storage("set_default", self.store.set_default(key, new))?;
        debug!(key, ?new, "default pointer changed");
        self.events().fire_post_modify(&event);
        Ok(())
    }

    /// Clears every pointer naming a removed entity. Caller holds the write
    /// lock. Listeners get the post-modify notification only: the removal
    /// has already happened and cannot be vetoed here.
    pub(crate) fn clear_defaults_for(
        &self,
        info_type: InfoType,
        id: &CatalogId,
        owner: Option<&CatalogId>,
    ) -> CatalogResult<()> {
        let mut slots: Vec<(String, &str)> = Vec::new();
        match info_type {
            InfoType::Workspace => {
                slots.push((DEFAULT_WORKSPACE_KEY.to_string(), "defaultWorkspace"));
                slots.push((default_store_key(id), "defaultDataStore"));
            }
            InfoType::Namespace => slots.push((DEFAULT_NAMESPACE_KEY.to_string(), "defaultNamespace")),
            InfoType::Store => {
                if let Some(ws) = owner {
                    slots.push((default_store_key(ws), "defaultDataStore"));
                }
            }
            _ => {}
        }

        for (key, property) in slots {
            let Some(current) = self.store.get_default(&key)? else {
                continue;
            };
            if &current != id {
                continue;
            }
            self.storage("clear_default", self.store.set_default(&key, None))?;
            debug!(key, %id, "cleared default pointer of removed entity");
            self.events().fire_post_modify(&ModifyEvent {
                subject: EventSubject::Catalog,
                changes: ChangeSet::single(property, Value::from(id), Value::Null),
            });
        }
        Ok(())
    }
}

fn required_id<T: CatalogInfo>(info: &T) -> CatalogResult<&CatalogId> {
    info.id().ok_or(CatalogError::MissingId(T::TYPE))
}

fn invalid_store(message: String) -> CatalogError {
    CatalogError::Validation(ModelError::Invalid {
        info_type: InfoType::Store,
        message,
    })
}

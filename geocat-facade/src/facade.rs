use crate::events::{AddEvent, CatalogEvents, CatalogListener, EventSubject, ModifyEvent, RemoveEvent};
use crate::{CatalogConfig, CatalogError, CatalogResult};
use geocat_model::{CatalogId, CatalogInfo, Document, InfoType, Predicate, Query, Tracked};
use geocat_storage::{EntityStore, InfoIter, StorageResult};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The public CRUD and query API over every catalog entity type.
///
/// Reads go straight to the store and never take the catalog write lock;
/// whether they run in parallel is up to the backend (the in-memory backend
/// allows it, SQLite serializes them on its connection). Writes (add, save,
/// remove and default-pointer changes) are serialized by a single
/// catalog-wide lock, which also covers the uniqueness and reference checks
/// that precede them.
pub struct CatalogFacade {
    pub(crate) store: EntityStore,
    events: CatalogEvents,
    write_lock: Mutex<()>,
}

impl CatalogFacade {
    /// Wraps an existing store.
    pub fn new(store: EntityStore) -> Self {
        Self {
            store,
            events: CatalogEvents::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Builds the configured backend and wraps it.
    pub fn open(config: &CatalogConfig) -> CatalogResult<Self> {
        let store = config
            .open_store()
            .map_err(|e| CatalogError::Config(format!("failed to open catalog backend: {e}")))?;
        info!(backend = store.backend_name(), "catalog opened");
        Ok(Self::new(store))
    }

    /// A facade over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(EntityStore::open_in_memory())
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    // ── Listeners ────────────────────────────────────────────────

    pub fn add_listener(&self, listener: Arc<dyn CatalogListener>) {
        self.events.add_listener(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn CatalogListener>) -> bool {
        self.events.remove_listener(listener)
    }

    pub(crate) fn events(&self) -> &CatalogEvents {
        &self.events
    }

    pub(crate) fn lock_writes(&self) -> parking_lot::MutexGuard<'_, ()> {
        self.write_lock.lock()
    }

    /// Converts a storage result, logging backend failures before they are
    /// re-raised.
    pub(crate) fn storage<R>(&self, operation: &str, result: StorageResult<R>) -> CatalogResult<R> {
        result.map_err(|e| {
            let err = CatalogError::from(e);
            if !err.is_client_error() {
                error!(operation, error = %err, "catalog storage failure");
            }
            err
        })
    }

    // ── Generic reads ────────────────────────────────────────────

    pub fn get<T: CatalogInfo>(&self, id: &CatalogId) -> CatalogResult<Option<T>> {
        Ok(self.store.get_by_id(id)?)
    }

    pub fn get_all<T: CatalogInfo>(&self) -> CatalogResult<Vec<T>> {
        Ok(self.store.get_all()?)
    }

    /// Exact match on `(property, value)` pairs; ambiguous matches fail.
    pub fn get_by_identity<T: CatalogInfo>(&self, pairs: &[(&str, Value)]) -> CatalogResult<Option<T>> {
        Ok(self.store.get_by_identity(pairs)?)
    }

    /// Filtered, sorted, paginated listing. The returned cursor must be
    /// closed or dropped to release it.
    pub fn list<T: CatalogInfo>(&self, query: &Query) -> CatalogResult<InfoIter<T>> {
        Ok(self.store.query(query)?)
    }

    pub fn list_as_vec<T: CatalogInfo>(&self, query: &Query) -> CatalogResult<Vec<T>> {
        Ok(self.store.query_as_list(query)?)
    }

    pub fn count<T: CatalogInfo>(&self, filter: &Predicate) -> CatalogResult<usize> {
        Ok(self.store.count::<T>(filter)?)
    }

    pub fn can_sort<T: CatalogInfo>(&self, property: &str) -> bool {
        self.store.can_sort::<T>(property)
    }

    /// Zero matches is `Ok(None)`; more than one is `CatalogError::Ambiguous`.
    pub fn find_unique<T: CatalogInfo>(&self, filter: &Predicate) -> CatalogResult<Option<T>> {
        Ok(self.store.find_unique(filter)?)
    }

    /// Like [`CatalogFacade::find_unique`], but `None` for a filter that
    /// matches nothing by construction.
    pub(crate) fn find_unique_in<T: CatalogInfo>(&self, filter: Option<Predicate>) -> CatalogResult<Option<T>> {
        match filter {
            Some(filter) => self.find_unique(&filter),
            None => Ok(None),
        }
    }

    pub(crate) fn list_in<T: CatalogInfo>(&self, filter: Option<Predicate>) -> CatalogResult<Vec<T>> {
        match filter {
            Some(filter) => self.list_as_vec(&Query::filter(filter)),
            None => Ok(Vec::new()),
        }
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Validates and persists a new entity, assigning an id if it has none.
    pub fn add<T: CatalogInfo>(&self, info: T) -> CatalogResult<T> {
        info.validate()?;
        let _guard = self.lock_writes();
        self.check_references(&info)?;
        let added = self.storage("add", self.store.add(info))?;
        let source = Document::from_info(&added)?;
        debug!(info_type = %T::TYPE, id = %source.id, "catalog add");
        self.events.fire_add(&AddEvent {
            subject: EventSubject::info(T::TYPE, &source.id),
            source,
        });
        Ok(added)
    }

    /// Saves the tracked changes of a persisted entity.
    ///
    /// 1. the entity must have an id
    /// 2. an empty diff is a no-op
    /// 3. the diff is applied to the stored entity, which must still exist;
    ///    the result is validated and its references checked
    /// 4. listeners see the diff and may veto
    /// 5. the store is updated
    /// 6. listeners are told the diff was applied
    ///
    /// On success `tracked` is reset to the saved entity. On any failure the
    /// diff is reverted.
    pub fn save<T: CatalogInfo>(&self, tracked: &mut Tracked<T>) -> CatalogResult<T> {
        let Some(id) = tracked.id().cloned() else {
            return Err(CatalogError::MissingId(T::TYPE));
        };
        if !tracked.is_dirty() {
            return Ok(tracked.get().clone());
        }
        match self.save_changes(&id, tracked) {
            Ok(saved) => Ok(saved),
            Err(err) => {
                debug!(info_type = %T::TYPE, %id, error = %err, "save aborted, reverting");
                tracked.revert();
                Err(err)
            }
        }
    }

    fn save_changes<T: CatalogInfo>(&self, id: &CatalogId, tracked: &mut Tracked<T>) -> CatalogResult<T> {
        let _guard = self.lock_writes();
        let Some(stored) = self.store.get_by_id::<T>(id)? else {
            return Err(CatalogError::NotFound {
                info_type: T::TYPE,
                id: id.to_string(),
            });
        };
        // Properties outside the diff keep their stored values.
        let changes = tracked.changes();
        let merged = changes.apply_to(&stored)?;
        merged.validate()?;
        self.check_references(&merged)?;

        let event = ModifyEvent {
            subject: EventSubject::info(T::TYPE, id),
            changes,
        };
        self.events.fire_modify(&event)?;
        let saved = self.storage("save", self.store.save(&merged))?;
        tracked.reset(saved.clone());
        debug!(info_type = %T::TYPE, %id, changed = ?event.changes.property_names(), "catalog save");
        self.events.fire_post_modify(&event);
        Ok(saved)
    }

    /// Removes a persisted entity.
    ///
    /// Refused with `StillReferenced` while other entities point at it.
    /// Default pointers naming it are cleared. Removing an entity that is not
    /// stored is a no-op.
    pub fn remove<T: CatalogInfo>(&self, info: &T) -> CatalogResult<()> {
        let Some(id) = info.id() else {
            return Ok(());
        };
        let _guard = self.lock_writes();
        let Some(stored) = self.store.get_by_id::<T>(id)? else {
            return Ok(());
        };
        self.check_unreferenced(T::TYPE, id)?;
        self.storage("remove", self.store.remove(&stored))?;
        let owner = Document::from_info(&stored)?
            .get_str("workspace.id")
            .and_then(|ws| CatalogId::parse(ws).ok());
        self.clear_defaults_for(T::TYPE, id, owner.as_ref())?;
        debug!(info_type = %T::TYPE, %id, "catalog remove");
        self.events.fire_remove(&RemoveEvent {
            subject: EventSubject::info(T::TYPE, id),
        });
        Ok(())
    }

    /// Removes an entity by type and id.
    pub fn remove_by_id(&self, info_type: InfoType, id: &CatalogId) -> CatalogResult<()> {
        use geocat_model::{Layer, LayerGroup, MapInfo, Namespace, Resource, Store, Style, Workspace};
        fn by_id<T: CatalogInfo>(facade: &CatalogFacade, id: &CatalogId) -> CatalogResult<()> {
            match facade.get::<T>(id)? {
                Some(info) => facade.remove(&info),
                None => Ok(()),
            }
        }
        match info_type {
            InfoType::Workspace => by_id::<Workspace>(self, id),
            InfoType::Namespace => by_id::<Namespace>(self, id),
            InfoType::Store => by_id::<Store>(self, id),
            InfoType::Resource => by_id::<Resource>(self, id),
            InfoType::Style => by_id::<Style>(self, id),
            InfoType::Layer => by_id::<Layer>(self, id),
            InfoType::LayerGroup => by_id::<LayerGroup>(self, id),
            InfoType::Map => by_id::<MapInfo>(self, id),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Drops every listener and releases the backend.
    pub fn dispose(&self) -> CatalogResult<()> {
        let _guard = self.lock_writes();
        self.events.clear();
        self.storage("dispose", self.store.dispose())?;
        info!("catalog disposed");
        Ok(())
    }
}

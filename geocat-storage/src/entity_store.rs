//! Typed entity store over a [`CatalogBackend`].

use crate::cursor::{CursorGuard, InfoIter};
use crate::{CatalogBackend, MemoryBackend, SqliteBackend, StorageError, StorageResult};
use geocat_model::{CatalogId, CatalogInfo, Document, InfoSchema, InfoType, Predicate, Query};
use geocat_types::{IdGenerator, UuidIdGenerator};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Generic, type-partitioned store for catalog entities.
///
/// Cloning is cheap and clones share the backend, the id generator and the
/// cursor counter.
#[derive(Clone)]
pub struct EntityStore {
    backend: Arc<dyn CatalogBackend>,
    ids: Arc<dyn IdGenerator>,
    cursors: Arc<AtomicUsize>,
}

impl EntityStore {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            ids: Arc::new(UuidIdGenerator),
            cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replaces the id generator used for entities added without an id.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// A store over a fresh [`MemoryBackend`].
    pub fn open_in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// A store over a [`SqliteBackend`] at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(Arc::new(SqliteBackend::open(path)?)))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // ── Reads ────────────────────────────────────────────────────

    pub fn get_by_id<T: CatalogInfo>(&self, id: &CatalogId) -> StorageResult<Option<T>> {
        self.backend
            .get(T::TYPE, id)?
            .map(|doc| doc.into_info().map_err(StorageError::from))
            .transpose()
    }

    /// Exact match on one or more `(property, value)` pairs. Dotted paths
    /// such as `workspace.id` are allowed. Fails with `Ambiguous` if more
    /// than one entity matches.
    pub fn get_by_identity<T: CatalogInfo>(&self, pairs: &[(&str, Value)]) -> StorageResult<Option<T>> {
        let filter = Predicate::all_equal(pairs.iter().map(|(k, v)| (*k, v.clone())));
        self.find_unique(&filter)
    }

    /// Every entity of type `T`, as of a single snapshot.
    pub fn get_all<T: CatalogInfo>(&self) -> StorageResult<Vec<T>> {
        self.backend
            .scan(T::TYPE, &Predicate::AcceptAll)?
            .into_iter()
            .map(|doc| doc.into_info().map_err(StorageError::from))
            .collect()
    }

    /// Runs a filtered, sorted, paginated query.
    ///
    /// Sort keys are checked with [`EntityStore::can_sort`] before anything
    /// is read. Ties keep insertion order.
    pub fn query<T: CatalogInfo>(&self, query: &Query) -> StorageResult<InfoIter<T>> {
        let docs = self.query_documents(T::TYPE, query)?;
        Ok(InfoIter::new(docs, CursorGuard::new(&self.cursors)))
    }

    /// Like [`EntityStore::query`], materialized.
    pub fn query_as_list<T: CatalogInfo>(&self, query: &Query) -> StorageResult<Vec<T>> {
        self.query(query)?.collect_all()
    }

    fn query_documents(&self, info_type: InfoType, query: &Query) -> StorageResult<Vec<Document>> {
        let schema = InfoSchema::for_type(info_type);
        if let Some(bad) = query.sort_by.iter().find(|s| !schema.can_sort(&s.property)) {
            return Err(StorageError::UnsupportedSort {
                info_type,
                property: bad.property.clone(),
            });
        }

        let mut docs = self.backend.scan(info_type, &query.filter)?;
        if !query.sort_by.is_empty() {
            docs.sort_by(|a, b| query.compare(&a.data, &b.data));
        }
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(docs.into_iter().skip(offset).take(limit).collect())
    }

    /// Zero matches is `Ok(None)`, one is returned, two or more is
    /// `StorageError::Ambiguous`.
    pub fn find_unique<T: CatalogInfo>(&self, filter: &Predicate) -> StorageResult<Option<T>> {
        let mut found = self.query_as_list::<T>(&Query::filter(filter.clone()).limit(2))?;
        match found.len() {
            0 | 1 => Ok(found.pop()),
            _ => Err(StorageError::Ambiguous {
                info_type: T::TYPE,
                filter: filter.to_string(),
            }),
        }
    }

    pub fn can_sort<T: CatalogInfo>(&self, property: &str) -> bool {
        self.can_sort_type(T::TYPE, property)
    }

    pub fn can_sort_type(&self, info_type: InfoType, property: &str) -> bool {
        InfoSchema::for_type(info_type).can_sort(property)
    }

    pub fn count<T: CatalogInfo>(&self, filter: &Predicate) -> StorageResult<usize> {
        self.count_type(T::TYPE, filter)
    }

    pub fn count_type(&self, info_type: InfoType, filter: &Predicate) -> StorageResult<usize> {
        self.backend.count(info_type, filter)
    }

    pub fn exists(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<bool> {
        self.backend.contains(info_type, id)
    }

    // ── Default pointers ─────────────────────────────────────────

    pub fn get_default(&self, key: &str) -> StorageResult<Option<CatalogId>> {
        self.backend.get_default(key)
    }

    pub fn set_default(&self, key: &str, id: Option<&CatalogId>) -> StorageResult<()> {
        self.backend.set_default(key, id)
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Persists a new entity.
    ///
    /// Assigns a fresh id when `info` has none; an id that is already set is
    /// kept verbatim, which keeps replication between stores identity-stable.
    pub fn add<T: CatalogInfo>(&self, mut info: T) -> StorageResult<T> {
        if info.id().is_none() {
            info.set_id(self.ids.generate(info.id_prefix()));
        }
        let doc = Document::from_info(&info)?;
        self.backend.insert(&doc, &info.natural_keys())?;
        debug!(info_type = %doc.info_type, id = %doc.id, "added {}", info.label());
        Ok(info)
    }

    /// Replaces a persisted entity.
    pub fn save<T: CatalogInfo>(&self, info: &T) -> StorageResult<T> {
        if info.id().is_none() {
            return Err(StorageError::MissingId { info_type: T::TYPE });
        }
        let doc = Document::from_info(info)?;
        self.backend.update(&doc, &info.natural_keys())?;
        debug!(info_type = %doc.info_type, id = %doc.id, "saved {}", info.label());
        Ok(info.clone())
    }

    /// Deletes a persisted entity. Returns false if it was not stored.
    pub fn remove<T: CatalogInfo>(&self, info: &T) -> StorageResult<bool> {
        match info.id() {
            Some(id) => self.backend.delete(T::TYPE, id),
            None => Ok(false),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Number of query cursors not yet closed or dropped.
    pub fn open_cursors(&self) -> usize {
        self.cursors.load(Ordering::SeqCst)
    }

    pub fn dispose(&self) -> StorageResult<()> {
        let open = self.open_cursors();
        if open > 0 {
            debug!(open, "disposing store with open cursors");
        }
        self.backend.dispose()
    }
}

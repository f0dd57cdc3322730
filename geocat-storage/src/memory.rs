use crate::{CatalogBackend, StorageError, StorageResult};
use geocat_model::{CatalogId, Document, InfoType, NaturalKey, Predicate};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-process backend. Contents are lost when it is dropped or disposed.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    partitions: HashMap<InfoType, Partition>,
    defaults: HashMap<String, CatalogId>,
}

#[derive(Default)]
struct Partition {
    objects: IndexMap<CatalogId, Document>,
    /// natural key -> owning id
    identities: HashMap<String, CatalogId>,
    /// owning id -> keys it holds
    owned: HashMap<CatalogId, Vec<String>>,
}

impl Partition {
    /// Fails if any key belongs to a document other than `id`.
    fn check_keys(&self, info_type: InfoType, id: &CatalogId, keys: &[String]) -> StorageResult<()> {
        for key in keys {
            match self.identities.get(key) {
                Some(owner) if owner != id => {
                    return Err(StorageError::Duplicate {
                        info_type,
                        key: key.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn release_keys(&mut self, id: &CatalogId) {
        if let Some(keys) = self.owned.remove(id) {
            for key in keys {
                self.identities.remove(&key);
            }
        }
    }

    fn claim_keys(&mut self, id: &CatalogId, keys: Vec<String>) {
        for key in &keys {
            self.identities.insert(key.clone(), id.clone());
        }
        self.owned.insert(id.clone(), keys);
    }
}

fn key_strings(keys: &[NaturalKey]) -> Vec<String> {
    keys.iter().map(ToString::to_string).collect()
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<Option<Document>> {
        let state = self.state.read();
        Ok(state
            .partitions
            .get(&info_type)
            .and_then(|p| p.objects.get(id))
            .cloned())
    }

    fn scan(&self, info_type: InfoType, filter: &Predicate) -> StorageResult<Vec<Document>> {
        let state = self.state.read();
        Ok(state
            .partitions
            .get(&info_type)
            .map(|p| {
                p.objects
                    .values()
                    .filter(|doc| filter.evaluate(&doc.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn contains(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<bool> {
        let state = self.state.read();
        Ok(state
            .partitions
            .get(&info_type)
            .is_some_and(|p| p.objects.contains_key(id)))
    }

    fn count(&self, info_type: InfoType, filter: &Predicate) -> StorageResult<usize> {
        let state = self.state.read();
        Ok(state
            .partitions
            .get(&info_type)
            .map(|p| p.objects.values().filter(|doc| filter.evaluate(&doc.data)).count())
            .unwrap_or(0))
    }

    fn insert(&self, doc: &Document, keys: &[NaturalKey]) -> StorageResult<()> {
        let keys = key_strings(keys);
        let mut state = self.state.write();
        let partition = state.partitions.entry(doc.info_type).or_default();
        if partition.objects.contains_key(&doc.id) {
            return Err(StorageError::DuplicateId {
                info_type: doc.info_type,
                id: doc.id.to_string(),
            });
        }
        partition.check_keys(doc.info_type, &doc.id, &keys)?;
        partition.claim_keys(&doc.id, keys);
        partition.objects.insert(doc.id.clone(), doc.clone());
        debug!(info_type = %doc.info_type, id = %doc.id, "inserted document");
        Ok(())
    }

    fn update(&self, doc: &Document, keys: &[NaturalKey]) -> StorageResult<()> {
        let keys = key_strings(keys);
        let mut state = self.state.write();
        let partition = state.partitions.entry(doc.info_type).or_default();
        if !partition.objects.contains_key(&doc.id) {
            return Err(StorageError::NotFound {
                info_type: doc.info_type,
                id: doc.id.to_string(),
            });
        }
        partition.check_keys(doc.info_type, &doc.id, &keys)?;
        partition.release_keys(&doc.id);
        partition.claim_keys(&doc.id, keys);
        partition.objects.insert(doc.id.clone(), doc.clone());
        debug!(info_type = %doc.info_type, id = %doc.id, "updated document");
        Ok(())
    }

    fn delete(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<bool> {
        let mut state = self.state.write();
        let Some(partition) = state.partitions.get_mut(&info_type) else {
            return Ok(false);
        };
        let removed = partition.objects.shift_remove(id).is_some();
        if removed {
            partition.release_keys(id);
            debug!(%info_type, %id, "deleted document");
        }
        Ok(removed)
    }

    fn get_default(&self, key: &str) -> StorageResult<Option<CatalogId>> {
        Ok(self.state.read().defaults.get(key).cloned())
    }

    fn set_default(&self, key: &str, id: Option<&CatalogId>) -> StorageResult<()> {
        let mut state = self.state.write();
        match id {
            Some(id) => state.defaults.insert(key.to_string(), id.clone()),
            None => state.defaults.remove(key),
        };
        Ok(())
    }

    fn dispose(&self) -> StorageResult<()> {
        let mut state = self.state.write();
        state.partitions.clear();
        state.defaults.clear();
        Ok(())
    }
}

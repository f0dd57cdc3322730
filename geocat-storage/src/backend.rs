use crate::StorageResult;
use geocat_model::{CatalogId, Document, InfoType, NaturalKey, Predicate};

/// A type-partitioned document store with a natural-key index and a keyed
/// default-pointer registry.
///
/// Implementations must be safe to share between threads. Each write is
/// atomic: a failed insert or update leaves no partial state behind, and
/// natural-key conflicts are detected under the same lock or transaction as
/// the write itself.
pub trait CatalogBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    fn get(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<Option<Document>>;

    /// Every document of `info_type` matching `filter`, in insertion order.
    ///
    /// The result is a snapshot taken under a single read.
    fn scan(&self, info_type: InfoType, filter: &Predicate) -> StorageResult<Vec<Document>>;

    fn contains(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<bool> {
        Ok(self.get(info_type, id)?.is_some())
    }

    fn count(&self, info_type: InfoType, filter: &Predicate) -> StorageResult<usize> {
        Ok(self.scan(info_type, filter)?.len())
    }

    /// Inserts a new document and claims its natural keys.
    ///
    /// Fails with `DuplicateId` if the id is taken and `Duplicate` if any key
    /// is owned by another document.
    fn insert(&self, doc: &Document, keys: &[NaturalKey]) -> StorageResult<()>;

    /// Replaces an existing document and its natural keys.
    ///
    /// Fails with `NotFound` if the document does not exist and `Duplicate`
    /// if any new key is owned by another document.
    fn update(&self, doc: &Document, keys: &[NaturalKey]) -> StorageResult<()>;

    /// Deletes a document and releases its keys. Returns false if it was absent.
    fn delete(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<bool>;

    fn get_default(&self, key: &str) -> StorageResult<Option<CatalogId>>;

    /// Sets (or with `None`, clears) a default pointer.
    fn set_default(&self, key: &str, id: Option<&CatalogId>) -> StorageResult<()>;

    /// Releases backend state. The backend must not be used afterwards.
    fn dispose(&self) -> StorageResult<()>;
}

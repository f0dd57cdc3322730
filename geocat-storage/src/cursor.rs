use crate::StorageResult;
use geocat_model::{CatalogInfo, Document};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts one open cursor for as long as it lives.
pub(crate) struct CursorGuard {
    open: Arc<AtomicUsize>,
}

impl CursorGuard {
    pub(crate) fn new(open: &Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self { open: Arc::clone(open) }
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Lazy, closeable result of a query.
///
/// Documents are deserialized one at a time as the iterator advances. The
/// cursor is released when the iterator is closed, exhausted or dropped,
/// whichever comes first, so early returns and `?` never leak it.
pub struct InfoIter<T> {
    docs: std::vec::IntoIter<Document>,
    guard: Option<CursorGuard>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CatalogInfo> InfoIter<T> {
    pub(crate) fn new(docs: Vec<Document>, guard: CursorGuard) -> Self {
        Self {
            docs: docs.into_iter(),
            guard: Some(guard),
            _marker: PhantomData,
        }
    }

    /// Releases the cursor. Later calls to `next` return `None`.
    pub fn close(&mut self) {
        self.guard = None;
        self.docs = Vec::new().into_iter();
    }

    pub fn is_closed(&self) -> bool {
        self.guard.is_none()
    }

    /// Drains the remaining items into a list, closing the cursor.
    pub fn collect_all(mut self) -> StorageResult<Vec<T>> {
        let items = self.by_ref().collect();
        self.close();
        items
    }
}

impl<T: CatalogInfo> Iterator for InfoIter<T> {
    type Item = StorageResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.guard.as_ref()?;
        match self.docs.next() {
            Some(doc) => Some(doc.into_info().map_err(Into::into)),
            None => {
                self.close();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.docs.size_hint()
    }
}

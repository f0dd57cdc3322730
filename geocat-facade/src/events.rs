//! Catalog change notifications.
//!
//! Every successful write produces exactly one notification sequence:
//! - add: `handle_add`
//! - save and default-pointer changes: `handle_modify` (may veto), then
//!   `handle_post_modify` once the change is stored
//! - remove: `handle_remove`
//!
//! An aborted write produces no post-modify notification.

use crate::{CatalogError, CatalogResult};
use geocat_model::{CatalogId, ChangeSet, Document, InfoType};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// What a notification is about.
#[derive(Debug, Clone, PartialEq)]
pub enum EventSubject {
    /// A catalog entity.
    Info { info_type: InfoType, id: CatalogId },
    /// The catalog itself, for default-pointer changes.
    Catalog,
}

impl EventSubject {
    pub fn info(info_type: InfoType, id: &CatalogId) -> Self {
        EventSubject::Info {
            info_type,
            id: id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddEvent {
    pub subject: EventSubject,
    /// The entity as stored.
    pub source: Document,
}

#[derive(Debug, Clone)]
pub struct ModifyEvent {
    pub subject: EventSubject,
    pub changes: ChangeSet,
}

#[derive(Debug, Clone)]
pub struct RemoveEvent {
    pub subject: EventSubject,
}

/// Receives catalog notifications.
///
/// Callbacks run while the catalog write lock is held, so a listener must
/// not write through the facade from inside one.
pub trait CatalogListener: Send + Sync {
    fn handle_add(&self, _event: &AddEvent) {}

    /// Called before a change is stored. Returning `Err` vetoes it.
    fn handle_modify(&self, _event: &ModifyEvent) -> Result<(), String> {
        Ok(())
    }

    /// Called after a change is stored.
    fn handle_post_modify(&self, _event: &ModifyEvent) {}

    fn handle_remove(&self, _event: &RemoveEvent) {}
}

/// Registered listeners, notified in registration order.
#[derive(Default)]
pub struct CatalogEvents {
    listeners: RwLock<Vec<Arc<dyn CatalogListener>>>,
}

impl CatalogEvents {
    pub fn add_listener(&self, listener: Arc<dyn CatalogListener>) {
        self.listeners.write().push(listener);
    }

    /// Removes `listener` (compared by pointer). Returns false if absent.
    pub fn remove_listener(&self, listener: &Arc<dyn CatalogListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn CatalogListener>> {
        self.listeners.read().clone()
    }

    pub(crate) fn fire_add(&self, event: &AddEvent) {
        for listener in self.snapshot() {
            listener.handle_add(event);
        }
    }

    /// Stops at the first veto.
    pub(crate) fn fire_modify(&self, event: &ModifyEvent) -> CatalogResult<()> {
        for listener in self.snapshot() {
            if let Err(reason) = listener.handle_modify(event) {
                debug!(subject = ?event.subject, %reason, "change vetoed");
                return Err(CatalogError::Vetoed(reason));
            }
        }
        Ok(())
    }

    pub(crate) fn fire_post_modify(&self, event: &ModifyEvent) {
        for listener in self.snapshot() {
            listener.handle_post_modify(event);
        }
    }

    pub(crate) fn fire_remove(&self, event: &RemoveEvent) {
        for listener in self.snapshot() {
            listener.handle_remove(event);
        }
    }
}

//! Field-level change tracking for the save protocol.
//!
//! A [`Tracked`] wraps a persisted entity. Every mutation goes through
//! [`Tracked::modify`] or [`Tracked::set_property`]; after each one the
//! wrapper diffs the entity's top-level properties against the state before
//! the call and folds the result into its change map. The map is keyed by
//! property name, so repeated edits of one property keep the first old value
//! and the latest new value, and an edit that restores the original value
//! drops the entry.

use crate::{CatalogInfo, ModelError, ModelResult};
use geocat_types::CatalogId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Deref;

/// One recorded property change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    pub property: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// The diff between the last committed state and the working state, in the
/// order properties were first touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<PropertyChange>,
}

impl ChangeSet {
    /// A single-property diff.
    pub fn single(property: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            changes: vec![PropertyChange {
                property: property.into(),
                old_value,
                new_value,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, property: &str) -> Option<&PropertyChange> {
        self.changes.iter().find(|c| c.property == property)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.property.as_str()).collect()
    }

    /// Writes the new values onto `base`, leaving every property outside the
    /// diff as `base` has it.
    ///
    /// A null new value removes the property, so it takes its default.
    pub fn apply_to<T: CatalogInfo>(&self, base: &T) -> ModelResult<T> {
        let mut map = to_map(base)?;
        for change in &self.changes {
            if change.property == "id" {
                return Err(ModelError::ImmutableProperty(change.property.clone()));
            }
            if change.new_value.is_null() {
                map.remove(&change.property);
            } else {
                map.insert(change.property.clone(), change.new_value.clone());
            }
        }
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    pub fn old_values(&self) -> Vec<&Value> {
        self.changes.iter().map(|c| &c.old_value).collect()
    }

    pub fn new_values(&self) -> Vec<&Value> {
        self.changes.iter().map(|c| &c.new_value).collect()
    }
}

/// A persisted entity plus the changes made to it since it was wrapped or
/// last committed.
#[derive(Debug, Clone)]
pub struct Tracked<T: CatalogInfo> {
    original: T,
    working: T,
    changes: IndexMap<String, PropertyChange>,
}

impl<T: CatalogInfo> Tracked<T> {
    pub fn new(info: T) -> Self {
        Self {
            original: info.clone(),
            working: info,
            changes: IndexMap::new(),
        }
    }

    /// Identity of the wrapped entity. Never changes while tracked.
    pub fn id(&self) -> Option<&CatalogId> {
        self.original.id()
    }

    /// The working state, including uncommitted changes.
    pub fn get(&self) -> &T {
        &self.working
    }

    /// The state as of wrapping or the last commit.
    pub fn original(&self) -> &T {
        &self.original
    }

    /// Applies `f` to the working state and records what it changed.
    ///
    /// Fails with [`ModelError::ImmutableProperty`] if `f` touched the id;
    /// the working state is then left as it was before the call.
    pub fn modify<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> ModelResult<R> {
        let mut next = self.working.clone();
        let out = f(&mut next);
        if next.id() != self.working.id() {
            return Err(ModelError::ImmutableProperty("id".to_string()));
        }
        self.apply(next)?;
        Ok(out)
    }

    /// Sets one top-level property by its serialized (camelCase) name.
    pub fn set_property(&mut self, property: &str, value: impl Into<Value>) -> ModelResult<()> {
        if property == "id" {
            return Err(ModelError::ImmutableProperty(property.to_string()));
        }
        let mut map = to_map(&self.working)?;
        match map.get_mut(property) {
            Some(slot) => *slot = value.into(),
            None => {
                return Err(ModelError::UnknownProperty {
                    info_type: T::TYPE,
                    property: property.to_string(),
                });
            }
        }
        let next: T = serde_json::from_value(Value::Object(map))?;
        self.apply(next)
    }

    fn apply(&mut self, next: T) -> ModelResult<()> {
        static NULL: Value = Value::Null;
        let before = to_map(&self.working)?;
        let after = to_map(&next)?;
        let mut keys: Vec<&String> = before.keys().collect();
        keys.extend(after.keys().filter(|k| !before.contains_key(*k)));

        for key in keys {
            let old = before.get(key).unwrap_or(&NULL);
            let new = after.get(key).unwrap_or(&NULL);
            if old == new {
                continue;
            }
            match self.changes.get_mut(key) {
                Some(change) => change.new_value = new.clone(),
                None => {
                    self.changes.insert(
                        key.clone(),
                        PropertyChange {
                            property: key.clone(),
                            old_value: old.clone(),
                            new_value: new.clone(),
                        },
                    );
                }
            }
        }
        self.changes.retain(|_, c| c.old_value != c.new_value);
        self.working = next;
        Ok(())
    }

    /// True if any property differs from the committed state.
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The pending diff.
    pub fn changes(&self) -> ChangeSet {
        ChangeSet {
            changes: self.changes.values().cloned().collect(),
        }
    }

    /// Makes the working state the new baseline and returns the applied diff.
    pub fn commit(&mut self) -> ChangeSet {
        let applied = self.changes();
        self.original = self.working.clone();
        self.changes.clear();
        applied
    }

    /// Replaces both states with `stored` and drops the pending diff.
    pub fn reset(&mut self, stored: T) {
        self.original = stored.clone();
        self.working = stored;
        self.changes.clear();
    }

    /// Discards pending changes.
    pub fn revert(&mut self) {
        self.working = self.original.clone();
        self.changes.clear();
    }

    /// Unwraps the working state.
    pub fn into_inner(self) -> T {
        self.working
    }
}

impl<T: CatalogInfo> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.working
    }
}

impl<T: CatalogInfo> From<T> for Tracked<T> {
    fn from(info: T) -> Self {
        Self::new(info)
    }
}

fn to_map<T: CatalogInfo>(info: &T) -> ModelResult<Map<String, Value>> {
    match serde_json::to_value(info)? {
        Value::Object(map) => Ok(map),
        _ => Err(ModelError::Invalid {
            info_type: T::TYPE,
            message: "entity does not serialize to an object".to_string(),
        }),
    }
}

use crate::{property, CatalogInfo, ModelError, ModelResult};
use geocat_types::{CatalogId, InfoType};
use serde::{Deserialize, Serialize};

/// A catalog entity in its persisted, type-erased form.
///
/// Every backend stores and filters documents. The `data` field holds the
/// entity's JSON, including its `id`, so it can be turned back into the typed
/// entity with [`Document::into_info`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: CatalogId,
    pub info_type: InfoType,
    pub data: serde_json::Value,
}

impl Document {
    /// Serializes a typed entity. Fails if it has no identity yet.
    pub fn from_info<T: CatalogInfo>(info: &T) -> ModelResult<Self> {
        let id = info.id().cloned().ok_or(ModelError::MissingId(T::TYPE))?;
        Ok(Self {
            id,
            info_type: T::TYPE,
            data: serde_json::to_value(info)?,
        })
    }

    /// Deserializes back into `T`, checking the type partition first.
    pub fn into_info<T: CatalogInfo>(self) -> ModelResult<T> {
        if self.info_type != T::TYPE {
            return Err(ModelError::TypeMismatch {
                expected: T::TYPE,
                found: self.info_type,
            });
        }
        Ok(serde_json::from_value(self.data)?)
    }

    /// Extract a string value from `data` using a dotted path (e.g., "workspace.id").
    pub fn get_str(&self, path: &str) -> Option<&str> {
        property::first(&self.data, path).and_then(|v| v.as_str())
    }

    /// Extract a boolean value from `data` using a dotted path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        property::first(&self.data, path).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value from `data` using a dotted path.
    pub fn get_number(&self, path: &str) -> Option<f64> {
        property::first(&self.data, path).and_then(|v| v.as_f64())
    }
}

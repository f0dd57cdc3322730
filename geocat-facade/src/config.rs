//! Catalog configuration, loadable from TOML.
//!
//! ```toml
//! [backend]
//! kind = "sqlite"
//! path = "/var/lib/geocat/catalog.db"
//! ```

use crate::{CatalogError, CatalogResult};
use geocat_storage::{EntityStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Which store backs the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Volatile, process-local.
    #[default]
    Memory,
    /// SQLite database file, created if missing.
    Sqlite { path: PathBuf },
}

impl CatalogConfig {
    pub fn from_toml_str(s: &str) -> CatalogResult<Self> {
        toml::from_str(s).map_err(|e| CatalogError::Config(format!("invalid catalog config: {e}")))
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded catalog config from {:?}", path);
        Ok(config)
    }

    pub(crate) fn open_store(&self) -> StorageResult<EntityStore> {
        match &self.backend {
            BackendConfig::Memory => Ok(EntityStore::open_in_memory()),
            BackendConfig::Sqlite { path } => EntityStore::open(path),
        }
    }
}

//! SQLite catalog backend.
//!
//! Layout:
//! - `object`: one row per entity, the JSON document in `blob`
//! - `object_identity`: natural keys, `UNIQUE(type_id, identity)`
//! - `default_object`: default pointers keyed by `def_key`
//!
//! Writes run in a transaction that checks conflicts before touching any
//! table, so a rejected write leaves nothing behind.

use crate::sql_filter;
use crate::{CatalogBackend, StorageError, StorageResult};
use geocat_model::{CatalogId, Document, InfoType, NaturalKey, Predicate};
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// Persistent backend over a single SQLite connection.
///
/// Every call, reads included, holds the connection mutex for its duration,
/// so reads on this backend run one at a time and wait for an in-flight
/// write. Use [`MemoryBackend`](crate::MemoryBackend) where concurrent reads
/// must not block each other.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (or creates) a catalog database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened sqlite catalog");
        Self::with_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let backend = Self {
            conn: Mutex::new(conn),
        };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS object (
                oid INTEGER PRIMARY KEY AUTOINCREMENT,
                type_id TEXT NOT NULL,
                id TEXT NOT NULL,
                blob TEXT NOT NULL,
                UNIQUE(type_id, id)
            );

            CREATE TABLE IF NOT EXISTS object_identity (
                type_id TEXT NOT NULL,
                identity TEXT NOT NULL,
                id TEXT NOT NULL,
                UNIQUE(type_id, identity)
            );

            CREATE INDEX IF NOT EXISTS object_identity_id ON object_identity (type_id, id);

            CREATE TABLE IF NOT EXISTS default_object (
                def_key TEXT PRIMARY KEY,
                id TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn row_to_document(info_type: InfoType, id: String, blob: String) -> StorageResult<Document> {
        let id = CatalogId::parse(&id)
            .map_err(|e| StorageError::InvalidData(format!("bad id in object table: {e}")))?;
        Ok(Document {
            id,
            info_type,
            data: serde_json::from_str(&blob)?,
        })
    }
}

fn check_keys(
    tx: &Transaction<'_>,
    info_type: InfoType,
    id: &CatalogId,
    keys: &[NaturalKey],
) -> StorageResult<()> {
    let mut stmt = tx.prepare("SELECT id FROM object_identity WHERE type_id = ?1 AND identity = ?2")?;
    for key in keys {
        let key = key.to_string();
        let owner: Option<String> = stmt
            .query_row(params![info_type.type_name(), key], |row| row.get(0))
            .optional()?;
        if owner.is_some_and(|owner| owner != id.as_str()) {
            return Err(StorageError::Duplicate { info_type, key });
        }
    }
    Ok(())
}

fn claim_keys(
    tx: &Transaction<'_>,
    info_type: InfoType,
    id: &CatalogId,
    keys: &[NaturalKey],
) -> StorageResult<()> {
    let mut stmt =
        tx.prepare("INSERT INTO object_identity (type_id, identity, id) VALUES (?1, ?2, ?3)")?;
    for key in keys {
        stmt.execute(params![info_type.type_name(), key.to_string(), id.as_str()])?;
    }
    Ok(())
}

fn exists(tx: &Transaction<'_>, info_type: InfoType, id: &CatalogId) -> StorageResult<bool> {
    let found: Option<i64> = tx
        .query_row(
            "SELECT oid FROM object WHERE type_id = ?1 AND id = ?2",
            params![info_type.type_name(), id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

impl CatalogBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<Option<Document>> {
        let conn = self.conn.lock();
        let blob: Option<String> = conn
            .query_row(
                "SELECT blob FROM object WHERE type_id = ?1 AND id = ?2",
                params![info_type.type_name(), id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        blob.map(|blob| Self::row_to_document(info_type, id.to_string(), blob))
            .transpose()
    }

    fn scan(&self, info_type: InfoType, filter: &Predicate) -> StorageResult<Vec<Document>> {
        let sql = sql_filter::translate(info_type, filter);
        let conn = self.conn.lock();
        let query = format!(
            "SELECT id, blob FROM object WHERE type_id = ?{} AND {} ORDER BY oid",
            sql.params.len() + 1,
            sql.clause
        );
        let mut params = sql.params;
        params.push(rusqlite::types::Value::Text(info_type.type_name().to_string()));

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, blob) = row?;
            let doc = Self::row_to_document(info_type, id, blob)?;
            if filter.evaluate(&doc.data) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    fn insert(&self, doc: &Document, keys: &[NaturalKey]) -> StorageResult<()> {
        let blob = serde_json::to_string(&doc.data)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        if exists(&tx, doc.info_type, &doc.id)? {
            return Err(StorageError::DuplicateId {
                info_type: doc.info_type,
                id: doc.id.to_string(),
            });
        }
        check_keys(&tx, doc.info_type, &doc.id, keys)?;
        tx.execute(
            "INSERT INTO object (type_id, id, blob) VALUES (?1, ?2, ?3)",
            params![doc.info_type.type_name(), doc.id.as_str(), blob],
        )?;
        claim_keys(&tx, doc.info_type, &doc.id, keys)?;
        tx.commit()?;
        debug!(info_type = %doc.info_type, id = %doc.id, "inserted row");
        Ok(())
    }

    fn update(&self, doc: &Document, keys: &[NaturalKey]) -> StorageResult<()> {
        let blob = serde_json::to_string(&doc.data)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        if !exists(&tx, doc.info_type, &doc.id)? {
            return Err(StorageError::NotFound {
                info_type: doc.info_type,
                id: doc.id.to_string(),
            });
        }
        check_keys(&tx, doc.info_type, &doc.id, keys)?;
        tx.execute(
            "UPDATE object SET blob = ?3 WHERE type_id = ?1 AND id = ?2",
            params![doc.info_type.type_name(), doc.id.as_str(), blob],
        )?;
        tx.execute(
            "DELETE FROM object_identity WHERE type_id = ?1 AND id = ?2",
            params![doc.info_type.type_name(), doc.id.as_str()],
        )?;
        claim_keys(&tx, doc.info_type, &doc.id, keys)?;
        tx.commit()?;
        debug!(info_type = %doc.info_type, id = %doc.id, "updated row");
        Ok(())
    }

    fn delete(&self, info_type: InfoType, id: &CatalogId) -> StorageResult<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM object_identity WHERE type_id = ?1 AND id = ?2",
            params![info_type.type_name(), id.as_str()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM object WHERE type_id = ?1 AND id = ?2",
            params![info_type.type_name(), id.as_str()],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    fn get_default(&self, key: &str) -> StorageResult<Option<CatalogId>> {
        let conn = self.conn.lock();
        let id: Option<String> = conn
            .query_row(
                "SELECT id FROM default_object WHERE def_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        id.map(|id| {
            CatalogId::parse(&id)
                .map_err(|e| StorageError::InvalidData(format!("bad id in default_object: {e}")))
        })
        .transpose()
    }

    fn set_default(&self, key: &str, id: Option<&CatalogId>) -> StorageResult<()> {
        let conn = self.conn.lock();
        match id {
            Some(id) => conn.execute(
                "INSERT OR REPLACE INTO default_object (def_key, id) VALUES (?1, ?2)",
                params![key, id.as_str()],
            )?,
            None => conn.execute("DELETE FROM default_object WHERE def_key = ?1", params![key])?,
        };
        Ok(())
    }

    fn dispose(&self) -> StorageResult<()> {
        let conn = self.conn.lock();
        conn.execute_batch("PRAGMA optimize;")?;
        debug!("disposed sqlite catalog");
        Ok(())
    }
}

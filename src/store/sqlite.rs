//! SQLite-backed record store
//!
//! Collections live in a single `collections` table keyed by collection key.
//! Each `put` is one upsert statement, so a collection is either fully
//! replaced or left as it was.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{schema, RecordStore};
use crate::error::StorageError;

/// SQLite database holding serialized collections
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database file
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        info!("Opening SQLite database at {:?}", db_path);

        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Database(format!("Failed to open SQLite: {}", e)))?;

        // WAL keeps readers from blocking on a concurrent save
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| StorageError::Database(format!("Failed to set PRAGMA: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(schema::init_schema)?;

        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        debug!("Opening in-memory SQLite database");

        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Database(format!("Failed to open in-memory SQLite: {}", e))
        })?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(schema::init_schema)?;

        Ok(store)
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&conn)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM collections WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::Database(format!("Failed to read collection {}: {}", key, e)))
        })
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO collections (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
                params![key, value, updated_at],
            )
            .map_err(|e| StorageError::Database(format!("Failed to write collection {}: {}", key, e)))?;
            Ok(())
        })
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT key FROM collections ORDER BY key")
                .map_err(|e| StorageError::Database(format!("Failed to prepare statement: {}", e)))?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| StorageError::Database(format!("Failed to list keys: {}", e)))?;
            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| StorageError::Database(format!("Failed to read row: {}", e)))
        })
    }
}

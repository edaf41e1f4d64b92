//! Record store: named collections over a key-value substrate
//!
//! Every collection is one JSON array stored under one key. Reads and writes
//! always move the whole array; there are no transactions, indexes or
//! migrations at this level.
//!
//! ## Backends
//!
//! - `MemoryStore` - process-local map (tests, dry runs)
//! - `SqliteStore` - `collections` table in a SQLite file
//! - `SledStore` - sled tree
//!
//! ## Failure semantics
//!
//! `load` treats a missing key and an unparseable value the same way: both
//! come back as an empty collection. Only failures of the substrate itself
//! (I/O, database errors) reach the caller.

pub mod memory;
pub mod schema;
pub mod sled_store;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sled_store::{SledStore, SledStoreConfig};
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Backend, Config};
use crate::error::StorageError;

/// Raw key-value substrate holding serialized collections
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`
    async fn put(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// List every stored key
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Load a collection, degrading absence and corruption to an empty sequence
pub async fn load<T, S>(store: &S, key: &str) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            warn!(key = %key, error = %e, "Stored collection is malformed, treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Serialize the whole collection and overwrite the previous value
pub async fn save<T, S>(store: &S, key: &str, records: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
    S: RecordStore + ?Sized,
{
    let value = serde_json::to_string(records)?;
    debug!(key = %key, count = records.len(), bytes = value.len(), "Saving collection");
    store.put(key, value).await
}

/// Open the backend selected by `config`
pub async fn open(config: &Config) -> Result<Arc<dyn RecordStore>, StorageError> {
    let store: Arc<dyn RecordStore> = match config.backend {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::Sqlite => {
            tokio::fs::create_dir_all(&config.storage_dir).await?;
            Arc::new(SqliteStore::open(&config.sqlite_path())?)
        }
        Backend::Sled => Arc::new(
            SledStore::new(SledStoreConfig {
                db_path: config.sled_path(),
                cache_size: config.sled_cache_bytes,
            })
            .await?,
        ),
    };

    info!(backend = %config.backend, dir = %config.storage_dir.display(), "Record store opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        let notes: Vec<Note> = load(&store, "notes").await.unwrap();
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_value_is_empty() {
        let store = MemoryStore::new();
        store.put("notes", "{not json".into()).await.unwrap();
        let notes: Vec<Note> = load(&store, "notes").await.unwrap();
        assert!(notes.is_empty());

        // Valid JSON of the wrong shape degrades the same way
        store.put("notes", "{\"id\":\"1\"}".into()).await.unwrap();
        let notes: Vec<Note> = load(&store, "notes").await.unwrap();
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let store = MemoryStore::new();
        let input = vec![note("b", "second"), note("a", "first"), note("c", "third")];

        save(&store, "notes", &input).await.unwrap();
        let loaded: Vec<Note> = load(&store, "notes").await.unwrap();
        assert_eq!(loaded, input);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryStore::new();
        save(&store, "notes", &[note("1", "old")]).await.unwrap();
        save(&store, "notes", &[note("2", "new")]).await.unwrap();

        let loaded: Vec<Note> = load(&store, "notes").await.unwrap();
        assert_eq!(loaded, vec![note("2", "new")]);
    }

    #[tokio::test]
    async fn test_open_memory_backend() {
        let store = open(&Config::in_memory()).await.unwrap();
        save(store.as_ref(), "notes", &[note("1", "x")]).await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["notes".to_string()]);
    }
}

//! sled-backed record store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use super::RecordStore;
use crate::error::StorageError;

/// Configuration for the sled store
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// Path to sled database
    pub db_path: PathBuf,
    /// Cache size in bytes
    pub cache_size: u64,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: crate::config::default_storage_dir().join("collections.sled"),
            cache_size: 16 * 1024 * 1024,
        }
    }
}

/// Record store backed by a sled tree
pub struct SledStore {
    db: sled::Db,
    collections: sled::Tree,
}

impl SledStore {
    /// Open or create the sled database
    pub async fn new(config: SledStoreConfig) -> Result<Self, StorageError> {
        if let Some(parent) = config.db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db = sled::Config::new()
            .path(&config.db_path)
            .cache_capacity(config.cache_size)
            .open()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let collections = db
            .open_tree("collections")
            .map_err(|e| StorageError::Database(e.to_string()))?;

        info!(path = %config.db_path.display(), "SledStore initialized");

        Ok(Self { db, collections })
    }

    /// Open a store at a specific path with default cache size
    pub async fn at_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::new(SledStoreConfig {
            db_path: path.as_ref().to_path_buf(),
            ..Default::default()
        })
        .await
    }
}

#[async_trait]
impl RecordStore for SledStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .collections
            .get(key.as_bytes())
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let Some(bytes) = value else {
            return Ok(None);
        };
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                // Handed on as unparseable text so the collection loads as corrupt
                warn!(key = %key, error = %e, "Stored value is not valid UTF-8");
                Ok(Some(String::new()))
            }
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.collections
            .insert(key.as_bytes(), value.into_bytes())
            .map_err(|e| StorageError::Database(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for item in self.collections.iter().keys() {
            let key = item.map_err(|e| StorageError::Database(e.to_string()))?;
            if let Ok(key) = String::from_utf8(key.to_vec()) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sled_store_crud() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::at_path(temp_dir.path().join("test.sled"))
            .await
            .unwrap();

        assert!(store.get("bitacora_energy").await.unwrap().is_none());

        store.put("bitacora_energy", "[]".into()).await.unwrap();
        store.put("bitacora_energy", "[{}]".into()).await.unwrap();

        assert_eq!(store.get("bitacora_energy").await.unwrap().as_deref(), Some("[{}]"));
        assert_eq!(store.keys().await.unwrap(), vec!["bitacora_energy"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_collection_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::at_path(temp_dir.path().join("test.sled"))
            .await
            .unwrap();

        // Valid JSON apart from one stray byte inside the name
        let raw: &[u8] = b"[{\"id\":\"c1\",\"name\":\"An\xFFa\",\"createdAt\":\"2026-10-19T00:00:00Z\"}]";
        store.collections.insert("bitacora_clients", raw).unwrap();

        assert_eq!(store.get("bitacora_clients").await.unwrap().as_deref(), Some(""));
        let clients: Vec<crate::models::Client> =
            crate::store::load(&store, "bitacora_clients").await.unwrap();
        assert!(clients.is_empty());
    }

    #[tokio::test]
    async fn test_sled_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.sled");

        {
            let store = SledStore::at_path(&path).await.unwrap();
            store.put("bitacora_spreads", "[1]".into()).await.unwrap();
        }

        let store = SledStore::at_path(&path).await.unwrap();
        assert_eq!(store.get("bitacora_spreads").await.unwrap().as_deref(), Some("[1]"));
    }
}

//! In-memory record store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::StorageError;

/// Process-local key-value map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw values
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_entries() {
        let store = MemoryStore::with_entries([("a", "[]"), ("b", "[1]")]);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.keys().await.unwrap(), vec!["a", "b"]);
        assert!(store.get("c").await.unwrap().is_none());
    }
}

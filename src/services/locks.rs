//! Per-collection write locks
//!
//! Every mutation is load → modify → save over the whole collection. Holding
//! the collection's lock for that cycle keeps two writers in this process
//! from overwriting each other's changes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct CollectionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.to_string()).or_default().clone();
        lock.lock_owned().await
    }
}

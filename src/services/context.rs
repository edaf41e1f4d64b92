//! Shared handles passed to every service

use std::sync::Arc;

use crate::config::{Config, ReferencePolicy};
use crate::models::Collection;
use crate::store::RecordStore;

use super::events::EventBus;
use super::locks::CollectionLocks;

/// Store handle, key namespace and coordination shared by all services
pub struct ServiceContext {
    pub store: Arc<dyn RecordStore>,
    pub key_prefix: String,
    pub reference_policy: ReferencePolicy,
    pub locks: CollectionLocks,
    pub events: Arc<EventBus>,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            key_prefix: config.key_prefix.clone(),
            reference_policy: config.reference_policy,
            locks: CollectionLocks::new(),
            events: Arc::new(EventBus::new()),
        }
    }

    /// Storage key for a collection under this context's prefix
    pub fn key(&self, collection: Collection) -> String {
        collection.key(&self.key_prefix)
    }
}

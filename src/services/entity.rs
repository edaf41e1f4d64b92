//! Generic CRUD service over one collection
//!
//! Every record type gets the same five operations. Mutations run under the
//! collection's lock and persist the full array before returning.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ReferencePolicy;
use crate::error::StorageError;
use crate::models::{Client, Collection, Record};
use crate::store;

use super::context::ServiceContext;
use super::events::StoreEvent;

/// CRUD service for one record type
pub struct EntityService<R: Record> {
    ctx: Arc<ServiceContext>,
    key: String,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> EntityService<R> {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let key = ctx.key(R::COLLECTION);
        Self {
            ctx,
            key,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        R::COLLECTION
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Full collection in stored order
    pub async fn get_all(&self) -> Result<Vec<R>, StorageError> {
        store::load(self.ctx.store.as_ref(), &self.key).await
    }

    /// Single record by id, no joins
    pub async fn get(&self, id: &str) -> Result<Option<R>, StorageError> {
        Ok(self.get_all().await?.into_iter().find(|r| r.id() == id))
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Assign identity and creation time, append and persist
    pub async fn create(&self, draft: R::Draft) -> Result<R, StorageError> {
        let record = R::from_draft(Uuid::new_v4().to_string(), Utc::now(), draft);
        record.validate()?;

        let _clients_guard = self.lock_clients(record.consultant_id().is_some()).await;
        let _guard = self.ctx.locks.acquire(&self.key).await;
        self.check_reference(&record).await?;

        let mut records = self.get_all().await?;
        records.push(record.clone());
        store::save(self.ctx.store.as_ref(), &self.key, &records).await?;

        debug!(collection = %R::COLLECTION, id = %record.id(), "Created record");
        self.ctx.events.emit(StoreEvent::Created {
            collection: R::COLLECTION,
            id: record.id().to_string(),
        });

        Ok(record)
    }

    /// Shallow-merge `patch` onto the record with `id` and persist
    ///
    /// Fields present in the patch replace the stored ones; everything else
    /// is kept. Fails with `NotFound` when no record has that id.
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R, StorageError> {
        let _clients_guard = self.lock_clients(true).await;
        let _guard = self.ctx.locks.acquire(&self.key).await;
        let mut records = self.get_all().await?;

        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StorageError::NotFound {
                collection: R::COLLECTION.to_string(),
                id: id.to_string(),
            })?;

        let merged = merge_patch(&records[index], &patch)?;
        merged.validate()?;
        self.check_reference(&merged).await?;

        records[index] = merged.clone();
        store::save(self.ctx.store.as_ref(), &self.key, &records).await?;

        debug!(collection = %R::COLLECTION, id = %id, "Updated record");
        self.ctx.events.emit(StoreEvent::Updated {
            collection: R::COLLECTION,
            id: id.to_string(),
        });

        Ok(merged)
    }

    /// Remove every record with `id`; a missing id is a no-op
    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.ctx.locks.acquire(&self.key).await;
        let mut records = self.get_all().await?;

        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = before - records.len();

        store::save(self.ctx.store.as_ref(), &self.key, &records).await?;

        if removed > 0 {
            debug!(collection = %R::COLLECTION, id = %id, removed, "Deleted record");
            self.ctx.events.emit(StoreEvent::Deleted {
                collection: R::COLLECTION,
                id: id.to_string(),
            });
        }

        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Hold the clients collection still while an enforced reference is
    /// checked and saved
    ///
    /// Always taken before the record's own collection lock.
    async fn lock_clients(&self, references_client: bool) -> Option<OwnedMutexGuard<()>> {
        let enforced = self.ctx.reference_policy == ReferencePolicy::Enforced;
        if !enforced || !references_client || R::COLLECTION == Collection::Clients {
            return None;
        }
        Some(self.ctx.locks.acquire(&self.ctx.key(Collection::Clients)).await)
    }

    async fn check_reference(&self, record: &R) -> Result<(), StorageError> {
        let Some(client_id) = record.consultant_id() else {
            return Ok(());
        };

        let clients: Vec<Client> =
            store::load(self.ctx.store.as_ref(), &self.ctx.key(Collection::Clients)).await?;
        if clients.iter().any(|c| c.id == client_id) {
            return Ok(());
        }

        match self.ctx.reference_policy {
            ReferencePolicy::Enforced => Err(StorageError::InvalidInput(format!(
                "ConsultantId '{}' does not match any client",
                client_id
            ))),
            ReferencePolicy::Lenient => {
                warn!(
                    collection = %R::COLLECTION,
                    id = %record.id(),
                    client_id = %client_id,
                    "Record references an unknown client"
                );
                Ok(())
            }
        }
    }
}

/// Shallow merge through the JSON shape; `id` and `createdAt` never change
fn merge_patch<R: Record>(current: &R, patch: &R::Patch) -> Result<R, StorageError> {
    let not_an_object = || {
        StorageError::Internal(format!("{} records must serialize as JSON objects", R::COLLECTION))
    };

    let mut merged = serde_json::to_value(current)?;
    let Value::Object(changes) = serde_json::to_value(patch)? else {
        return Err(not_an_object());
    };
    let Value::Object(fields) = &mut merged else {
        return Err(not_an_object());
    };

    for (field, value) in changes {
        if field == "id" || field == "createdAt" {
            continue;
        }
        fields.insert(field, value);
    }

    serde_json::from_value(merged)
        .map_err(|e| StorageError::InvalidInput(format!("patch does not fit {}: {}", R::COLLECTION, e)))
}

//! Service layer for bitacora
//!
//! Services sit between callers and the record store. Each one owns one
//! collection and adds:
//! - Identity and creation stamps
//! - Input validation
//! - Per-collection write serialization
//! - Event emission for audit logging
//!
//! ## Architecture
//!
//! ```text
//! CLI / callers
//!     ↓
//! Service Layer (services/*.rs)
//!     ↓
//! Record Store (store/*.rs)
//!     ↓
//! SQLite / sled / memory
//! ```

pub mod client_service;
pub mod context;
pub mod entity;
pub mod events;
pub mod locks;

pub use client_service::ClientService;
pub use context::ServiceContext;
pub use entity::EntityService;
pub use events::{spawn_logging_listener, EventBus, EventListener, LoggingEventListener, StoreEvent};
pub use locks::CollectionLocks;

use std::sync::Arc;

use crate::config::Config;
use crate::error::StorageError;
use crate::models::{Appointment, Collection, ConsultantEnergy, EnergyLog, Ritual, Spread, Transaction};
use crate::store::{self, RecordStore};
use crate::views::Snapshot;

pub type AppointmentService = EntityService<Appointment>;
pub type TransactionService = EntityService<Transaction>;
pub type EnergyService = EntityService<EnergyLog>;
pub type ConsultantEnergyService = EntityService<ConsultantEnergy>;
pub type RitualService = EntityService<Ritual>;
pub type SpreadService = EntityService<Spread>;

/// Service container for dependency injection
///
/// All services share one store handle, one lock table and one event bus.
pub struct Services {
    pub clients: Arc<ClientService>,
    pub appointments: Arc<AppointmentService>,
    pub transactions: Arc<TransactionService>,
    pub energy: Arc<EnergyService>,
    pub consultant_energy: Arc<ConsultantEnergyService>,
    pub rituals: Arc<RitualService>,
    pub spreads: Arc<SpreadService>,
    pub events: Arc<EventBus>,
    ctx: Arc<ServiceContext>,
}

impl Services {
    /// Create all services over an existing store
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self::with_context(Arc::new(ServiceContext::new(store, config)))
    }

    pub fn with_context(ctx: Arc<ServiceContext>) -> Self {
        Self {
            clients: Arc::new(ClientService::new(ctx.clone())),
            appointments: Arc::new(EntityService::new(ctx.clone())),
            transactions: Arc::new(EntityService::new(ctx.clone())),
            energy: Arc::new(EntityService::new(ctx.clone())),
            consultant_energy: Arc::new(EntityService::new(ctx.clone())),
            rituals: Arc::new(EntityService::new(ctx.clone())),
            spreads: Arc::new(EntityService::new(ctx.clone())),
            events: ctx.events.clone(),
            ctx,
        }
    }

    /// Open the configured backend and build services over it
    pub async fn open(config: &Config) -> Result<Self, StorageError> {
        let store = store::open(config).await?;
        Ok(Self::new(store, config))
    }

    /// Load every collection once, for read-side views
    pub async fn snapshot(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot {
            clients: self.clients.get_all().await?,
            appointments: self.appointments.get_all().await?,
            transactions: self.transactions.get_all().await?,
            energy: self.energy.get_all().await?,
            consultant_energy: self.consultant_energy.get_all().await?,
            rituals: self.rituals.get_all().await?,
            spreads: self.spreads.get_all().await?,
        })
    }

    /// Stored keys that belong to no collection under the configured prefix
    pub async fn stray_keys(&self) -> Result<Vec<String>, StorageError> {
        let known: Vec<String> = Collection::ALL.iter().map(|c| self.ctx.key(*c)).collect();
        let keys = self.ctx.store.keys().await?;
        Ok(keys.into_iter().filter(|key| !known.contains(key)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientDraft, SpreadDraft};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_services_share_one_store() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let services = Services::new(store.clone(), &Config::in_memory());

        let ana = services.clients.create(ClientDraft::named("Ana")).await.unwrap();
        services
            .spreads
            .create(SpreadDraft::new("Path?").for_client(&ana.id))
            .await
            .unwrap();

        // A second container over the same store sees the same data
        let again = Services::new(store, &Config::in_memory());
        let snapshot = again.snapshot().await.unwrap();
        assert_eq!(snapshot.clients.len(), 1);
        assert_eq!(snapshot.spreads.len(), 1);
        assert!(snapshot.appointments.is_empty());
    }

    #[tokio::test]
    async fn test_stray_keys() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::with_entries([
            ("bitacora_clients", "[]"),
            ("bitacora_horoscopes", "[]"),
            ("other_app_settings", "{}"),
        ]));
        let services = Services::new(store, &Config::in_memory());

        services.spreads.create(SpreadDraft::new("Path?")).await.unwrap();

        assert_eq!(
            services.stray_keys().await.unwrap(),
            vec!["bitacora_horoscopes", "other_app_settings"]
        );
    }
}

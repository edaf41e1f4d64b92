//! Client service - roster CRUD plus the joined client profile

use std::sync::Arc;

use crate::error::StorageError;
use crate::models::{
    Client, ClientDraft, ClientPatch, ClientProfile, ConsultantEnergy, Ritual, Spread,
};
use crate::resolver::records_for_client;

use super::context::ServiceContext;
use super::entity::EntityService;

/// Client roster service
pub struct ClientService {
    records: EntityService<Client>,
    sessions: EntityService<ConsultantEnergy>,
    spreads: EntityService<Spread>,
    rituals: EntityService<Ritual>,
}

impl ClientService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            records: EntityService::new(ctx.clone()),
            sessions: EntityService::new(ctx.clone()),
            spreads: EntityService::new(ctx.clone()),
            rituals: EntityService::new(ctx),
        }
    }

    /// The plain CRUD service underneath
    pub fn records(&self) -> &EntityService<Client> {
        &self.records
    }

    pub async fn get_all(&self) -> Result<Vec<Client>, StorageError> {
        self.records.get_all().await
    }

    /// Client with its sessions, spreads and rituals attached
    ///
    /// The dependent collections are loaded and filtered on every call.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ClientProfile>, StorageError> {
        let Some(client) = self.records.get(id).await? else {
            return Ok(None);
        };

        let sessions = self.sessions.get_all().await?;
        let spreads = self.spreads.get_all().await?;
        let rituals = self.rituals.get_all().await?;

        Ok(Some(ClientProfile {
            consultant_energies: records_for_client(&sessions, &client.id),
            spreads: records_for_client(&spreads, &client.id),
            rituals: records_for_client(&rituals, &client.id),
            client,
        }))
    }

    pub async fn create(&self, draft: ClientDraft) -> Result<Client, StorageError> {
        self.records.create(draft).await
    }

    pub async fn update(&self, id: &str, patch: ClientPatch) -> Result<Client, StorageError> {
        self.records.update(id, patch).await
    }

    /// Store the written report for a client
    pub async fn save_report(&self, id: &str, report: impl Into<String>) -> Result<Client, StorageError> {
        self.update(
            id,
            ClientPatch {
                client_report: Some(report.into()),
                ..Default::default()
            },
        )
        .await
    }

    /// Remove the client; records that reference it are left in place
    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.records.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{ConsultantEnergyDraft, RitualDraft, SpreadDraft};
    use crate::store::MemoryStore;

    fn context() -> Arc<ServiceContext> {
        Arc::new(ServiceContext::new(Arc::new(MemoryStore::new()), &Config::in_memory()))
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let service = ClientService::new(context());
        assert!(service.get_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_joins_dependents() {
        let ctx = context();
        let service = ClientService::new(ctx.clone());
        let sessions: EntityService<ConsultantEnergy> = EntityService::new(ctx.clone());
        let spreads: EntityService<Spread> = EntityService::new(ctx.clone());
        let rituals: EntityService<Ritual> = EntityService::new(ctx.clone());

        let ana = service.create(ClientDraft::named("Ana")).await.unwrap();
        let luz = service.create(ClientDraft::named("Luz")).await.unwrap();

        let session = sessions
            .create(ConsultantEnergyDraft::session(&ana.id, "low", "high"))
            .await
            .unwrap();
        sessions
            .create(ConsultantEnergyDraft::session(&luz.id, "high", "high"))
            .await
            .unwrap();
        let spread = spreads
            .create(SpreadDraft::new("Career?").for_client(&ana.id))
            .await
            .unwrap();
        spreads.create(SpreadDraft::new("Unlinked")).await.unwrap();
        rituals
            .create(RitualDraft::new("Protection").for_client(&luz.id))
            .await
            .unwrap();

        let profile = service.get_by_id(&ana.id).await.unwrap().unwrap();
        assert_eq!(profile.client, ana);
        assert_eq!(profile.consultant_energies, vec![session]);
        assert_eq!(profile.spreads, vec![spread]);
        assert!(profile.rituals.is_empty());

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["ConsultantEnergies"][0]["energyBefore"], "low");
        assert_eq!(json["Rituals"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_join_reflects_later_writes() {
        let ctx = context();
        let service = ClientService::new(ctx.clone());
        let spreads: EntityService<Spread> = EntityService::new(ctx.clone());

        let ana = service.create(ClientDraft::named("Ana")).await.unwrap();
        assert!(service.get_by_id(&ana.id).await.unwrap().unwrap().spreads.is_empty());

        spreads
            .create(SpreadDraft::new("Love?").for_client(&ana.id))
            .await
            .unwrap();
        assert_eq!(service.get_by_id(&ana.id).await.unwrap().unwrap().spreads.len(), 1);
    }

    #[tokio::test]
    async fn test_save_report() {
        let service = ClientService::new(context());
        let ana = service.create(ClientDraft::named("Ana")).await.unwrap();

        let updated = service.save_report(&ana.id, "Strong intuition").await.unwrap();
        assert_eq!(updated.client_report.as_deref(), Some("Strong intuition"));
        assert_eq!(updated.name, "Ana");
        assert!(service.save_report("nobody", "x").await.unwrap_err().is_not_found());
    }
}

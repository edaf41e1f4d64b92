//! Client roster records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, Collection, ConsultantEnergy, Record, Ritual, Spread};
use crate::error::StorageError;

/// A client (consultant) of the practice; other records point here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Free-form report written about the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_report: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub client_report: Option<String>,
}

impl ClientDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_report: Option<String>,
}

impl Record for Client {
    type Draft = ClientDraft;
    type Patch = ClientPatch;

    const COLLECTION: Collection = Collection::Clients;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: ClientDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            notes: draft.notes,
            created_at,
            client_report: draft.client_report,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text("name", &self.name)?;
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(StorageError::InvalidInput(format!(
                "email '{}' is not a valid address",
                self.email
            )));
        }
        Ok(())
    }
}

/// A client together with the records that reference it
///
/// The dependent arrays are derived on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(flatten)]
    pub client: Client,
    #[serde(rename = "ConsultantEnergies", default)]
    pub consultant_energies: Vec<ConsultantEnergy>,
    #[serde(rename = "Spreads", default)]
    pub spreads: Vec<Spread>,
    #[serde(rename = "Rituals", default)]
    pub rituals: Vec<Ritual>,
}

//! Ritual journal records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    double_option, normalize_reference, reference_field, require_date, require_text, Collection,
    Record,
};
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ritual {
    pub id: String,
    #[serde(rename = "ConsultantId", default, deserialize_with = "reference_field")]
    pub consultant_id: Option<String>,
    pub date: String,
    pub intention: String,
    #[serde(default)]
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RitualDraft {
    #[serde(rename = "ConsultantId", default)]
    pub consultant_id: Option<String>,
    /// Defaults to the creation day when omitted
    #[serde(default)]
    pub date: Option<String>,
    pub intention: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RitualDraft {
    pub fn new(intention: impl Into<String>) -> Self {
        Self {
            intention: intention.into(),
            ..Default::default()
        }
    }

    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.consultant_id = Some(client_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RitualPatch {
    #[serde(
        rename = "ConsultantId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub consultant_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for Ritual {
    type Draft = RitualDraft;
    type Patch = RitualPatch;

    const COLLECTION: Collection = Collection::Rituals;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: RitualDraft) -> Self {
        let date = draft
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| created_at.format("%Y-%m-%d").to_string());

        Self {
            id,
            consultant_id: normalize_reference(draft.consultant_id),
            date,
            intention: draft.intention,
            result: draft.result,
            name: draft.name,
            kind: draft.kind,
            notes: draft.notes,
            created_at,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text("intention", &self.intention)?;
        require_date("date", &self.date)
    }

    fn consultant_id(&self) -> Option<&str> {
        self.consultant_id.as_deref()
    }
}

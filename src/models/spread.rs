//! Tarot spread journal records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    double_option, normalize_reference, reference_field, require_date, require_text, Collection,
    Record,
};
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spread {
    pub id: String,
    #[serde(rename = "ConsultantId", default, deserialize_with = "reference_field")]
    pub consultant_id: Option<String>,
    pub question: String,
    /// Cards drawn, as written by the practitioner
    #[serde(default)]
    pub cards: String,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadDraft {
    #[serde(rename = "ConsultantId", default)]
    pub consultant_id: Option<String>,
    pub question: String,
    #[serde(default)]
    pub cards: String,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl SpreadDraft {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
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
pub struct SpreadPatch {
    #[serde(
        rename = "ConsultantId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub consultant_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Record for Spread {
    type Draft = SpreadDraft;
    type Patch = SpreadPatch;

    const COLLECTION: Collection = Collection::Spreads;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: SpreadDraft) -> Self {
        Self {
            id,
            consultant_id: normalize_reference(draft.consultant_id),
            question: draft.question,
            cards: draft.cards,
            interpretation: draft.interpretation,
            date: draft.date.filter(|d| !d.trim().is_empty()),
            created_at,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text("question", &self.question)?;
        match &self.date {
            Some(date) => require_date("date", date),
            None => Ok(()),
        }
    }

    fn consultant_id(&self) -> Option<&str> {
        self.consultant_id.as_deref()
    }
}

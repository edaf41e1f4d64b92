//! Energy journal records
//!
//! `EnergyLog` is the practitioner's own daily reading; `ConsultantEnergy`
//! records a client's energy before and after a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{double_option, normalize_reference, reference_field, require_date, Collection, Record};
use crate::error::StorageError;

/// Inclusive bounds of `EnergyLog::energy_level`
pub const ENERGY_LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLog {
    pub id: String,
    pub date: String,
    pub energy_level: u8,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLogDraft {
    /// Defaults to the creation day when omitted
    #[serde(default)]
    pub date: Option<String>,
    pub energy_level: u8,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub notes: String,
}

impl EnergyLogDraft {
    pub fn new(energy_level: u8, mood: impl Into<String>) -> Self {
        Self {
            energy_level,
            mood: mood.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLogPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for EnergyLog {
    type Draft = EnergyLogDraft;
    type Patch = EnergyLogPatch;

    const COLLECTION: Collection = Collection::Energy;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: EnergyLogDraft) -> Self {
        let date = draft
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| created_at.format("%Y-%m-%d").to_string());

        Self {
            id,
            date,
            energy_level: draft.energy_level,
            mood: draft.mood,
            notes: draft.notes,
            created_at,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        if !ENERGY_LEVEL_RANGE.contains(&self.energy_level) {
            return Err(StorageError::InvalidInput(format!(
                "energyLevel must be between {} and {}, got {}",
                ENERGY_LEVEL_RANGE.start(),
                ENERGY_LEVEL_RANGE.end(),
                self.energy_level
            )));
        }
        require_date("date", &self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantEnergy {
    pub id: String,
    #[serde(rename = "ConsultantId", default, deserialize_with = "reference_field")]
    pub consultant_id: Option<String>,
    #[serde(default)]
    pub energy_before: String,
    #[serde(default)]
    pub energy_after: String,
    #[serde(default)]
    pub notes: String,
    /// Session date, when recorded separately from `createdAt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantEnergyDraft {
    #[serde(rename = "ConsultantId", default)]
    pub consultant_id: Option<String>,
    #[serde(default)]
    pub energy_before: String,
    #[serde(default)]
    pub energy_after: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl ConsultantEnergyDraft {
    pub fn session(
        client_id: impl Into<String>,
        energy_before: impl Into<String>,
        energy_after: impl Into<String>,
    ) -> Self {
        Self {
            consultant_id: Some(client_id.into()),
            energy_before: energy_before.into(),
            energy_after: energy_after.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantEnergyPatch {
    #[serde(
        rename = "ConsultantId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub consultant_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Record for ConsultantEnergy {
    type Draft = ConsultantEnergyDraft;
    type Patch = ConsultantEnergyPatch;

    const COLLECTION: Collection = Collection::ConsultantEnergy;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: ConsultantEnergyDraft) -> Self {
        Self {
            id,
            consultant_id: normalize_reference(draft.consultant_id),
            energy_before: draft.energy_before,
            energy_after: draft.energy_after,
            notes: draft.notes,
            date: draft.date.filter(|d| !d.trim().is_empty()),
            created_at,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        match &self.date {
            Some(date) => require_date("date", date),
            None => Ok(()),
        }
    }

    fn consultant_id(&self) -> Option<&str> {
        self.consultant_id.as_deref()
    }
}

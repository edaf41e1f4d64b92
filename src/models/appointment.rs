//! Appointment calendar records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{double_option, normalize_reference, reference_field, require_text, Collection, Record};
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub title: String,
    /// Start instant
    pub date: DateTime<Utc>,
    /// Time of day as entered (`HH:MM`), informational
    #[serde(default)]
    pub time: String,
    #[serde(rename = "ConsultantId", default, deserialize_with = "reference_field")]
    pub consultant_id: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub time: String,
    #[serde(rename = "ConsultantId", default)]
    pub consultant_id: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl AppointmentDraft {
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            time: date.format("%H:%M").to_string(),
            date,
            consultant_id: None,
            notes: String::new(),
            status: AppointmentStatus::Scheduled,
        }
    }

    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.consultant_id = Some(client_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(
        rename = "ConsultantId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub consultant_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Record for Appointment {
    type Draft = AppointmentDraft;
    type Patch = AppointmentPatch;

    const COLLECTION: Collection = Collection::Appointments;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: AppointmentDraft) -> Self {
        Self {
            id,
            title: draft.title,
            date: draft.date,
            time: draft.time,
            consultant_id: normalize_reference(draft.consultant_id),
            notes: draft.notes,
            status: draft.status,
            created_at,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text("title", &self.title)
    }

    fn consultant_id(&self) -> Option<&str> {
        self.consultant_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_source_shape() {
        let json = r#"{
            "id": "a1",
            "title": "Lectura",
            "date": "2026-10-19T15:00:00.000Z",
            "time": "15:00",
            "ConsultantId": "",
            "notes": "",
            "status": "completed",
            "createdAt": "2026-10-01T10:00:00.000Z"
        }"#;

        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Completed);
        assert_eq!(appointment.consultant_id, None);
    }

    #[test]
    fn test_status_defaults_to_scheduled() {
        let json = r#"{"title": "Ritual de luna", "date": "2026-10-19T20:00:00Z"}"#;
        let draft: AppointmentDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_patch_explicit_null_clears_client() {
        let patch: AppointmentPatch = serde_json::from_str(r#"{"ConsultantId": null}"#).unwrap();
        assert_eq!(patch.consultant_id, Some(None));

        let patch: AppointmentPatch = serde_json::from_str(r#"{"notes": "x"}"#).unwrap();
        assert_eq!(patch.consultant_id, None);
    }
}

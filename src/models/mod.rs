//! Record types for every collection
//!
//! All records serialize with camelCase field names; the client reference is
//! spelled `ConsultantId` on the wire, which is the shape the persisted data
//! has always used.
//!
//! Each record type comes with a `*Draft` (fields supplied by the caller on
//! create) and a `*Patch` (fields that may change on update). Identity and
//! `createdAt` appear in neither.

pub mod appointment;
pub mod client;
pub mod energy;
pub mod ritual;
pub mod spread;
pub mod transaction;

pub use appointment::{Appointment, AppointmentDraft, AppointmentPatch, AppointmentStatus};
pub use client::{Client, ClientDraft, ClientPatch, ClientProfile};
pub use energy::{
    ConsultantEnergy, ConsultantEnergyDraft, ConsultantEnergyPatch, EnergyLog, EnergyLogDraft,
    EnergyLogPatch,
};
pub use ritual::{Ritual, RitualDraft, RitualPatch};
pub use spread::{Spread, SpreadDraft, SpreadPatch};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StorageError;

/// Logical collections, one per record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Clients,
    Appointments,
    Transactions,
    Energy,
    ConsultantEnergy,
    Rituals,
    Spreads,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Clients,
        Collection::Appointments,
        Collection::Transactions,
        Collection::Energy,
        Collection::ConsultantEnergy,
        Collection::Rituals,
        Collection::Spreads,
    ];

    /// Key suffix under the configured prefix
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Appointments => "appointments",
            Collection::Transactions => "transactions",
            Collection::Energy => "energy",
            Collection::ConsultantEnergy => "energy_consultant",
            Collection::Rituals => "rituals",
            Collection::Spreads => "spreads",
        }
    }

    /// Full storage key, e.g. `bitacora_clients`
    pub fn key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "consultant_energy" | "sessions" => Ok(Collection::ConsultantEnergy),
            name => Collection::ALL
                .into_iter()
                .find(|c| c.name() == name)
                .ok_or_else(|| StorageError::InvalidInput(format!("unknown collection '{}'", s))),
        }
    }
}

/// A record stored in one collection
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Caller-supplied fields for `create`
    type Draft: DeserializeOwned + Send + Sync;
    /// Partial fields for `update`; absent fields must serialize to nothing
    type Patch: Serialize + DeserializeOwned + Send + Sync;

    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Build a new record with its identity and creation stamp
    fn from_draft(id: String, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Boundary validation run on create and after every merge
    fn validate(&self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Owning client, if this record type references one
    fn consultant_id(&self) -> Option<&str> {
        None
    }
}

/// Parse the date text stored on records
///
/// Accepts RFC 3339 instants, `YYYY-MM-DDTHH:MM[:SS]` without offset (read as
/// UTC) and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_record_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Empty or blank references mean "no client"
pub fn normalize_reference(reference: Option<String>) -> Option<String> {
    reference.filter(|id| !id.trim().is_empty())
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), StorageError> {
    if value.trim().is_empty() {
        return Err(StorageError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn require_date(field: &str, value: &str) -> Result<(), StorageError> {
    if parse_record_date(value).is_none() {
        return Err(StorageError::InvalidInput(format!(
            "{} '{}' is not an ISO-8601 date",
            field, value
        )));
    }
    Ok(())
}

/// `ConsultantId` deserializer: null and "" both become `None`
pub(crate) fn reference_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_reference)
}

/// Distinguishes an absent patch field from an explicit `null`
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

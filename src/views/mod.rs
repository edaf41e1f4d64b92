//! Read-side views derived from service output
//!
//! These are pure functions over loaded collections: the dashboard summary,
//! monthly ledger totals, agenda grouping and energy journal search. None of
//! them touch the store.

pub mod agenda;
pub mod dashboard;
pub mod journal;
pub mod ledger;

pub use agenda::{group_by_day, for_day, upcoming};
pub use dashboard::{summarize, Activity, ActivityKind, DashboardSummary};
pub use journal::{
    average_energy, search_clients, search_energy, search_rituals, search_sessions, search_spreads,
};
pub use ledger::{month_summary, MonthSummary};

use serde::Serialize;

use crate::models::{
    Appointment, Client, ConsultantEnergy, EnergyLog, Ritual, Spread, Transaction,
};

/// Every collection, loaded once
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub appointments: Vec<Appointment>,
    pub transactions: Vec<Transaction>,
    pub energy: Vec<EnergyLog>,
    pub consultant_energy: Vec<ConsultantEnergy>,
    pub rituals: Vec<Ritual>,
    pub spreads: Vec<Spread>,
}

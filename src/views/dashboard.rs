//! Dashboard summary
//!
//! Everything the landing page shows, computed from one [`Snapshot`]:
//! average energy, headline counts, today's appointments with their client,
//! this month's finances and the five most recent journal entries.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::{agenda, journal, ledger, Snapshot};
use crate::models::{parse_record_date, Appointment, Record};
use crate::resolver::{resolve_owner, WithOwner};

/// How many entries the recent activity feed keeps
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Energy,
    Ritual,
    Spread,
}

/// One line of the recent activity feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub kind: ActivityKind,
    pub id: String,
    pub date: DateTime<Utc>,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Mean energy level, 0 without logs
    pub energy_average: f64,
    pub client_count: usize,
    pub ritual_count: usize,
    pub spread_count: usize,
    pub todays_appointments: Vec<WithOwner<Appointment>>,
    pub month_income: f64,
    pub month_balance: f64,
    pub recent_activity: Vec<Activity>,
}

/// Build the dashboard as of `now`; "today" and "this month" are UTC
pub fn summarize(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardSummary {
    let todays = agenda::for_day(&snapshot.appointments, now.date_naive());
    let month = ledger::month_summary(&snapshot.transactions, now.year(), now.month());

    DashboardSummary {
        energy_average: journal::average_energy(&snapshot.energy).unwrap_or(0.0),
        client_count: snapshot.clients.len(),
        ritual_count: snapshot.rituals.len(),
        spread_count: snapshot.spreads.len(),
        todays_appointments: resolve_owner(&todays, &snapshot.clients),
        month_income: month.income,
        month_balance: month.balance,
        recent_activity: recent_activity(snapshot, RECENT_ACTIVITY_LIMIT),
    }
}

/// Newest journal entries across energy logs, rituals and spreads
///
/// Entries are dated by their own `date` and fall back to `createdAt` when
/// it is missing or does not parse.
pub fn recent_activity(snapshot: &Snapshot, limit: usize) -> Vec<Activity> {
    let mut feed = Vec::new();

    for log in &snapshot.energy {
        feed.push(Activity {
            kind: ActivityKind::Energy,
            id: log.id.clone(),
            date: dated(Some(&log.date), log),
            label: format!("Energy {}/10", log.energy_level),
        });
    }
    for ritual in &snapshot.rituals {
        feed.push(Activity {
            kind: ActivityKind::Ritual,
            id: ritual.id.clone(),
            date: dated(Some(&ritual.date), ritual),
            label: ritual.name.clone().unwrap_or_else(|| ritual.intention.clone()),
        });
    }
    for spread in &snapshot.spreads {
        feed.push(Activity {
            kind: ActivityKind::Spread,
            id: spread.id.clone(),
            date: dated(spread.date.as_deref(), spread),
            label: spread.question.clone(),
        });
    }

    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(limit);
    feed
}

fn dated<R: Record>(date: Option<&str>, record: &R) -> DateTime<Utc> {
    date.and_then(parse_record_date)
        .unwrap_or_else(|| record.created_at())
}

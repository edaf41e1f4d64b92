//! Journal search and energy helpers
//!
//! Every search is a case-insensitive substring match over a few text
//! fields. Records joined to their client also match on the client's name.
//! An empty term matches everything.

use crate::models::{Client, ConsultantEnergy, EnergyLog, Ritual, Spread};
use crate::resolver::WithOwner;

/// Logs whose mood, notes or date contain `term`
pub fn search_energy<'a>(logs: &'a [EnergyLog], term: &str) -> Vec<&'a EnergyLog> {
    let term = normalize(term);
    logs.iter()
        .filter(|log| {
            contains_term(&term, &[log.mood.as_str(), log.notes.as_str(), log.date.as_str()])
        })
        .collect()
}

/// Clients whose name or email contain `term`
pub fn search_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let term = normalize(term);
    clients
        .iter()
        .filter(|client| contains_term(&term, &[client.name.as_str(), client.email.as_str()]))
        .collect()
}

/// Sessions whose client name or notes contain `term`
pub fn search_sessions<'a>(
    sessions: &'a [WithOwner<ConsultantEnergy>],
    term: &str,
) -> Vec<&'a WithOwner<ConsultantEnergy>> {
    let term = normalize(term);
    sessions
        .iter()
        .filter(|s| contains_term(&term, &[owner_name(s), s.record.notes.as_str()]))
        .collect()
}

/// Spreads whose question, cards or client name contain `term`
pub fn search_spreads<'a>(
    spreads: &'a [WithOwner<Spread>],
    term: &str,
) -> Vec<&'a WithOwner<Spread>> {
    let term = normalize(term);
    spreads
        .iter()
        .filter(|s| {
            let record = &s.record;
            contains_term(&term, &[record.question.as_str(), record.cards.as_str(), owner_name(s)])
        })
        .collect()
}

/// Rituals whose intention, result or client name contain `term`
pub fn search_rituals<'a>(
    rituals: &'a [WithOwner<Ritual>],
    term: &str,
) -> Vec<&'a WithOwner<Ritual>> {
    let term = normalize(term);
    rituals
        .iter()
        .filter(|r| {
            let record = &r.record;
            contains_term(&term, &[record.intention.as_str(), record.result.as_str(), owner_name(r)])
        })
        .collect()
}

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

fn contains_term(term: &str, fields: &[&str]) -> bool {
    term.is_empty() || fields.iter().any(|field| field.to_lowercase().contains(term))
}

fn owner_name<R>(record: &WithOwner<R>) -> &str {
    record.owner_label("")
}

/// Mean energy level rounded to one decimal, `None` without logs
pub fn average_energy(logs: &[EnergyLog]) -> Option<f64> {
    if logs.is_empty() {
        return None;
    }
    let total: u32 = logs.iter().map(|log| u32::from(log.energy_level)).sum();
    let mean = f64::from(total) / logs.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ClientDraft, ConsultantEnergyDraft, EnergyLogDraft, Record, RitualDraft, SpreadDraft,
    };
    use crate::resolver::resolve_owner;
    use chrono::Utc;

    fn roster() -> Vec<Client> {
        vec![
            Client::from_draft(
                "c1".into(),
                Utc::now(),
                ClientDraft {
                    email: "ana@correo.com".into(),
                    ..ClientDraft::named("Ana Torres")
                },
            ),
            Client::from_draft("c2".into(), Utc::now(), ClientDraft::named("Luz")),
        ]
    }

    fn log(level: u8, mood: &str, notes: &str, date: &str) -> EnergyLog {
        EnergyLog::from_draft(
            format!("e-{}-{}", level, date),
            Utc::now(),
            EnergyLogDraft {
                date: Some(date.into()),
                energy_level: level,
                mood: mood.into(),
                notes: notes.into(),
            },
        )
    }

    #[test]
    fn test_search_matches_mood_notes_and_date() {
        let logs = vec![
            log(7, "Sereno", "long walk", "2026-10-01"),
            log(3, "tired", "Full Moon drained me", "2026-10-02"),
            log(5, "neutral", "", "2026-09-15"),
        ];

        assert_eq!(search_energy(&logs, "SERENO").len(), 1);
        assert_eq!(search_energy(&logs, "moon")[0].energy_level, 3);
        assert_eq!(search_energy(&logs, "2026-10").len(), 2);
        assert_eq!(search_energy(&logs, "").len(), 3);
        assert!(search_energy(&logs, "joy").is_empty());
    }

    #[test]
    fn test_average_energy() {
        assert_eq!(average_energy(&[]), None);

        let logs = vec![
            log(7, "", "", "2026-10-01"),
            log(8, "", "", "2026-10-02"),
            log(8, "", "", "2026-10-03"),
        ];
        assert_eq!(average_energy(&logs), Some(7.7));
    }

    #[test]
    fn test_search_clients_by_name_or_email() {
        let clients = roster();

        let ids = |term: &str| -> Vec<String> {
            search_clients(&clients, term).iter().map(|c| c.id.clone()).collect()
        };
        assert_eq!(ids("torres"), vec!["c1"]);
        assert_eq!(ids("CORREO"), vec!["c1"]);
        assert_eq!(ids("luz"), vec!["c2"]);
        assert_eq!(ids("").len(), 2);
        assert!(ids("maria").is_empty());
    }

    #[test]
    fn test_search_sessions_by_client_name_or_notes() {
        let clients = roster();
        let sessions = vec![
            ConsultantEnergy::from_draft(
                "s1".into(),
                Utc::now(),
                ConsultantEnergyDraft::session("c1", "low", "high"),
            ),
            ConsultantEnergy::from_draft(
                "s2".into(),
                Utc::now(),
                ConsultantEnergyDraft {
                    notes: "Heavy shoulders".into(),
                    ..ConsultantEnergyDraft::session("gone", "low", "medium")
                },
            ),
        ];
        let joined = resolve_owner(&sessions, &clients);

        let found = search_sessions(&joined, "ana");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.id, "s1");

        let found = search_sessions(&joined, "shoulders");
        assert_eq!(found[0].record.id, "s2");

        // Dangling owners only match on their own fields
        assert!(search_sessions(&joined, "gone").is_empty());
    }

    #[test]
    fn test_search_spreads_by_question_cards_or_client() {
        let clients = roster();
        let spreads = vec![
            Spread::from_draft(
                "p1".into(),
                Utc::now(),
                SpreadDraft {
                    cards: "The Tower, Three of Cups".into(),
                    ..SpreadDraft::new("New job?").for_client("c2")
                },
            ),
            Spread::from_draft("p2".into(), Utc::now(), SpreadDraft::new("Move abroad?")),
        ];
        let joined = resolve_owner(&spreads, &clients);

        let ids = |term: &str| -> Vec<String> {
            search_spreads(&joined, term).iter().map(|s| s.record.id.clone()).collect()
        };
        assert_eq!(ids("tower"), vec!["p1"]);
        assert_eq!(ids("abroad"), vec!["p2"]);
        assert_eq!(ids("LUZ"), vec!["p1"]);
        assert!(ids("interpretation").is_empty());
    }

    #[test]
    fn test_search_rituals_by_intention_result_or_client() {
        let clients = roster();
        let rituals = vec![
            Ritual::from_draft(
                "r1".into(),
                Utc::now(),
                RitualDraft {
                    result: "Felt lighter".into(),
                    ..RitualDraft::new("Protection").for_client("c1")
                },
            ),
            Ritual::from_draft("r2".into(), Utc::now(), RitualDraft::new("Abundance")),
        ];
        let joined = resolve_owner(&rituals, &clients);

        let ids = |term: &str| -> Vec<String> {
            search_rituals(&joined, term).iter().map(|r| r.record.id.clone()).collect()
        };
        assert_eq!(ids("protect"), vec!["r1"]);
        assert_eq!(ids("lighter"), vec!["r1"]);
        assert_eq!(ids("ana torres"), vec!["r1"]);
        assert_eq!(ids("abundance"), vec!["r2"]);
        assert_eq!(ids(" ").len(), 2);
    }
}

//! Relationship resolver
//!
//! Joins dependent records to their owning client in memory, by string
//! equality of `ConsultantId` against `Client.id`. Nothing is indexed or
//! cached; every call walks both slices. A reference that matches no client
//! resolves to `None` and is never an error.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Client, Record};

/// A record paired with its owning client, if one resolves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithOwner<R> {
    #[serde(flatten)]
    pub record: R,
    #[serde(rename = "Consultant", skip_serializing_if = "Option::is_none")]
    pub owner: Option<Client>,
}

impl<R> WithOwner<R> {
    /// Owner name, or `fallback` when the reference is empty or dangling
    pub fn owner_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        owner_label(self.owner.as_ref(), fallback)
    }
}

/// Pair each record with the client its `ConsultantId` names
pub fn resolve_owner<R: Record>(records: &[R], clients: &[Client]) -> Vec<WithOwner<R>> {
    let by_id: HashMap<&str, &Client> = clients.iter().map(|c| (c.id.as_str(), c)).collect();

    records
        .iter()
        .map(|record| WithOwner {
            record: record.clone(),
            owner: record
                .consultant_id()
                .and_then(|id| by_id.get(id))
                .map(|client| (*client).clone()),
        })
        .collect()
}

/// Display label for an optional owner
pub fn owner_label<'a>(owner: Option<&'a Client>, fallback: &'a str) -> &'a str {
    owner.map(|c| c.name.as_str()).unwrap_or(fallback)
}

/// Records whose `ConsultantId` equals `client_id`, in stored order
pub fn records_for_client<R: Record>(records: &[R], client_id: &str) -> Vec<R> {
    records
        .iter()
        .filter(|r| r.consultant_id() == Some(client_id))
        .cloned()
        .collect()
}

/// Ids of records that reference a client that does not exist
pub fn dangling_references<R: Record>(records: &[R], clients: &[Client]) -> Vec<String> {
    records
        .iter()
        .filter(|r| {
            r.consultant_id()
                .is_some_and(|id| !clients.iter().any(|c| c.id == id))
        })
        .map(|r| r.id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientDraft, Spread, SpreadDraft};
    use chrono::Utc;

    fn client(id: &str, name: &str) -> Client {
        Client::from_draft(id.into(), Utc::now(), ClientDraft::named(name))
    }

    fn spread(id: &str, owner: Option<&str>) -> Spread {
        let mut draft = SpreadDraft::new("Question");
        draft.consultant_id = owner.map(String::from);
        Spread::from_draft(id.into(), Utc::now(), draft)
    }

    #[test]
    fn test_resolve_owner() {
        let clients = vec![client("c1", "Ana"), client("c2", "Luz")];
        let spreads = vec![spread("s1", Some("c2")), spread("s2", None), spread("s3", Some("gone"))];

        let resolved = resolve_owner(&spreads, &clients);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].owner.as_ref().map(|c| c.id.as_str()), Some("c2"));
        assert_eq!(resolved[0].owner_label("Unknown client"), "Luz");
        assert!(resolved[1].owner.is_none());
        assert!(resolved[2].owner.is_none());
        assert_eq!(resolved[2].owner_label("Unknown client"), "Unknown client");
    }

    #[test]
    fn test_records_for_client() {
        let spreads = vec![
            spread("s1", Some("c1")),
            spread("s2", Some("c2")),
            spread("s3", Some("c1")),
            spread("s4", None),
        ];

        let ids: Vec<String> = records_for_client(&spreads, "c1").into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
        assert!(records_for_client(&spreads, "c9").is_empty());
    }

    #[test]
    fn test_dangling_references() {
        let clients = vec![client("c1", "Ana")];
        let spreads = vec![spread("s1", Some("c1")), spread("s2", Some("c2")), spread("s3", None)];
        assert_eq!(dangling_references(&spreads, &clients), vec!["s2"]);
    }

    #[test]
    fn test_owner_serializes_as_consultant() {
        let clients = vec![client("c1", "Ana")];
        let resolved = resolve_owner(&[spread("s1", Some("c1"))], &clients);
        let json = serde_json::to_value(&resolved[0]).unwrap();
        assert_eq!(json["id"], "s1");
        assert_eq!(json["Consultant"]["name"], "Ana");
    }
}

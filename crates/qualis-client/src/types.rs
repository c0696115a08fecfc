//! Normalized records returned by quality-server clients.

use serde::{Deserialize, Serialize};

/// One project in a server's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub instance_url: String,
    /// Stable project key; part of the local identity key.
    pub key: String,
    /// Server-internal id. Falls back to the key on servers that no longer
    /// expose one.
    pub id: String,
    pub name: String,
}

/// A quality profile as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// A project associated with a quality profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileProject {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// One quality-profile changelog entry.
///
/// The typed fields are lifted out of `raw`, which keeps the full event as
/// the server sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChangeEvent {
    pub action: Option<String>,
    pub date: Option<String>,
    pub author_login: Option<String>,
    pub author_name: Option<String>,
    pub raw: serde_json::Value,
}

impl ProfileChangeEvent {
    #[must_use]
    pub fn from_json(raw: serde_json::Value) -> Self {
        let field = |name: &str| raw.get(name).and_then(|v| v.as_str()).map(String::from);
        Self {
            action: field("action"),
            date: field("date"),
            author_login: field("authorLogin"),
            author_name: field("authorName"),
            raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn change_event_lifts_fields() {
        let event = ProfileChangeEvent::from_json(serde_json::json!({
            "date": "2015-02-23T17:58:39+0100",
            "action": "ACTIVATED",
            "authorLogin": "ada",
            "authorName": "Ada Lovelace",
            "ruleKey": "squid:S1234",
            "params": {"severity": "MAJOR"}
        }));
        assert_eq!(event.action.as_deref(), Some("ACTIVATED"));
        assert_eq!(event.author_login.as_deref(), Some("ada"));
        assert_eq!(event.raw["params"]["severity"], "MAJOR");
    }

    #[test]
    fn change_event_tolerates_missing_author() {
        let event = ProfileChangeEvent::from_json(serde_json::json!({
            "date": "2015-02-23T17:58:39+0100",
            "action": "UPDATED"
        }));
        assert_eq!(event.author_login, None);
        assert_eq!(event.author_name, None);
    }
}

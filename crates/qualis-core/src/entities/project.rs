use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A remote project tracked under one collector on one server instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub id: String,
    pub collector_id: String,
    pub instance_url: String,
    /// Stable project key on the remote server (part of the identity).
    pub remote_key: String,
    /// Server-internal id; servers may reassign it, so it is refreshed on
    /// every reconciliation.
    pub remote_id: String,
    pub name: String,
    /// Display name of the server instance the project lives on.
    pub nice_name: String,
    pub description: String,
    pub enabled: bool,
    /// Created through the push API instead of discovery; never auto-deleted.
    pub pushed: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Project {
    #[must_use]
    pub fn key(&self) -> ProjectKey<'_> {
        ProjectKey {
            collector_id: &self.collector_id,
            instance_url: &self.instance_url,
            remote_key: &self.remote_key,
        }
    }

    /// Same instance and remote key, ignoring collector identity.
    ///
    /// Remote inventory entries carry no collector identity yet, so matching
    /// against persisted projects of one collector uses this comparison.
    #[must_use]
    pub fn same_remote(&self, instance_url: &str, remote_key: &str) -> bool {
        self.instance_url == instance_url && self.remote_key == remote_key
    }
}

/// Identity key of a [`Project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectKey<'a> {
    pub collector_id: &'a str,
    pub instance_url: &'a str,
    pub remote_key: &'a str,
}

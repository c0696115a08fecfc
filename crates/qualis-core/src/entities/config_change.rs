use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ConfigOperation;

/// Audit entry for one quality-profile configuration change.
///
/// At most one record exists per
/// (`collector_id`, `user_login`, `operation`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigChangeRecord {
    pub id: String,
    pub collector_id: String,
    pub user_name: Option<String>,
    pub user_login: Option<String>,
    pub operation: ConfigOperation,
    /// Change time in epoch milliseconds.
    pub timestamp: i64,
    /// Raw change payload, stored under the `event` key.
    pub change: serde_json::Value,
}

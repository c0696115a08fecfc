use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CollectorKind;
use crate::servers::{ServerEntry, ServerListProvider};

/// One registered collector: a metric kind plus the servers it polls.
///
/// `servers` is the immutable per-cycle snapshot of configuration; it is not
/// persisted and is rebuilt from configuration before every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Collector {
    pub id: String,
    pub name: String,
    pub kind: CollectorKind,
    pub last_executed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub servers: Vec<ServerEntry>,
}

impl ServerListProvider for Collector {
    fn servers(&self) -> &[ServerEntry] {
        &self.servers
    }
}

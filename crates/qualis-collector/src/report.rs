//! Per-cycle counters, logged per server and returned to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

use qualis_core::enums::CollectorKind;

/// Outcome of one server within a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerReport {
    pub instance_url: String,
    pub version: String,
    /// Projects in the server's inventory.
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    /// Snapshots appended.
    pub refreshed: usize,
    /// Config-change records persisted.
    pub audited: usize,
    /// Profiles whose changelog could not be read; the others were still audited.
    pub audit_failed_profiles: usize,
    /// The changelog step did not run (old server or a failed profile listing).
    pub audit_skipped: bool,
}

/// Outcome of one full cycle of one collector kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub kind: CollectorKind,
    pub collector_id: String,
    /// Projects whose enabled flag flipped.
    pub state_changes: usize,
    pub servers: Vec<ServerReport>,
    pub deleted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CycleReport {
    #[must_use]
    pub fn total_created(&self) -> usize {
        self.servers.iter().map(|s| s.created).sum()
    }

    #[must_use]
    pub fn total_refreshed(&self) -> usize {
        self.servers.iter().map(|s| s.refreshed).sum()
    }

    #[must_use]
    pub fn total_audited(&self) -> usize {
        self.servers.iter().map(|s| s.audited).sum()
    }
}

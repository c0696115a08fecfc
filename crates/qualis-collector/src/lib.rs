//! # qualis-collector
//!
//! Reconciliation and audit engine for Qualis.
//!
//! A [`CollectorTask`] runs one cycle of one collector kind:
//! 1. [`enablement`] recomputes enabled flags from dashboard references.
//! 2. For each configured server in order: resolve the API version, fetch
//!    the inventory, apply the [`reconcile`] delta, [`refresh`] snapshots of
//!    enabled projects, and record quality-profile changes via [`audit`]
//!    (servers >= 5.0 only).
//! 3. The [`reconcile`] deletion pass removes projects gone from every
//!    server, sparing pushed ones.

pub mod audit;
pub mod dispatch;
pub mod enablement;
pub mod error;
pub mod reconcile;
pub mod refresh;
pub mod report;
pub mod task;

pub use dispatch::{NoProgress, ProgressSink};
pub use error::CollectorError;
pub use report::{CycleReport, ServerReport};
pub use task::CollectorTask;

//! Entity structs for the Qualis record set.
//!
//! Each entity maps to a table in the libSQL database (see
//! `qualis-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` so the dashboard can consume them as JSON.

mod collector;
mod component;
mod config_change;
mod project;
mod snapshot;

pub use collector::Collector;
pub use component::{ComponentItem, DashboardComponent};
pub use config_change::ConfigChangeRecord;
pub use project::{Project, ProjectKey};
pub use snapshot::{Metric, QualitySnapshot};

use clap::{Args, Subcommand, ValueEnum};
use qualis_core::enums::CollectorKind;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run one collection cycle per kind.
    Collect(CollectArgs),
    /// Run collection cycles repeatedly until interrupted.
    Watch(WatchArgs),
    /// List tracked projects.
    Projects(ProjectsArgs),
    /// List recorded quality-profile changes.
    Changes(ChangesArgs),
    /// Show the snapshot history of one project.
    Snapshots(SnapshotsArgs),
    /// Dump JSON schema for a dashboard-facing record.
    Schema(SchemaArgs),
    /// Show the effective configuration with secrets redacted.
    Config,
}

/// Arguments for `qualis collect`.
#[derive(Clone, Debug, Args)]
pub struct CollectArgs {
    /// Collector kind (quality, security). Both run concurrently when omitted.
    #[arg(long)]
    pub kind: Option<CollectorKind>,
}

/// Arguments for `qualis watch`.
#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    #[arg(long)]
    pub kind: Option<CollectorKind>,
    /// Seconds between cycle starts (defaults to `general.watch_interval_secs`).
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

/// Arguments for `qualis projects`.
#[derive(Clone, Debug, Args)]
pub struct ProjectsArgs {
    #[arg(long)]
    pub kind: Option<CollectorKind>,
    /// Only projects referenced by a dashboard component.
    #[arg(long)]
    pub enabled: bool,
    /// Only projects of this server URL.
    #[arg(long)]
    pub server: Option<String>,
}

/// Arguments for `qualis changes`.
#[derive(Clone, Debug, Args)]
pub struct ChangesArgs {
    #[arg(long)]
    pub kind: Option<CollectorKind>,
    #[arg(long, default_value_t = 50)]
    pub limit: u32,
}

/// Arguments for `qualis snapshots`.
#[derive(Clone, Debug, Args)]
pub struct SnapshotsArgs {
    pub project_id: String,
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
}

/// Records with a published JSON schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaRecord {
    Collector,
    Project,
    Snapshot,
    ConfigChange,
    Component,
}

/// Arguments for `qualis schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub record: SchemaRecord,
}

use anyhow::Context;
use qualis_core::entities::{Project, QualitySnapshot};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SnapshotsArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct SnapshotHistory {
    project: Project,
    snapshots: Vec<QualitySnapshot>,
}

/// Handle `qualis snapshots`.
pub async fn handle(args: &SnapshotsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project = ctx
        .store
        .get_project(&args.project_id)
        .await
        .with_context(|| format!("failed to load project {}", args.project_id))?;
    let snapshots = ctx
        .store
        .list_snapshots(&project.id, args.limit)
        .await
        .context("failed to list snapshots")?;
    output(&SnapshotHistory { project, snapshots }, flags.format)
}

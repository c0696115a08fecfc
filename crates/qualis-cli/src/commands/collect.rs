use anyhow::Context;
use qualis_collector::CycleReport;
use qualis_core::enums::CollectorKind;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CollectArgs;
use crate::commands::shared::for_each_kind;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::CycleProgress;

/// Handle `qualis collect`.
///
/// Every selected kind runs to completion even if another fails; reports of
/// the successful kinds are printed before the failure is returned.
pub async fn handle(args: &CollectArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let results = for_each_kind(args.kind, |kind| run_cycle(ctx, kind)).await;

    let mut reports = Vec::new();
    let mut failed = Vec::new();
    for (kind, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(error) => {
                tracing::error!(%kind, error = %format!("{error:#}"), "collection cycle failed");
                failed.push(kind.as_str());
            }
        }
    }

    output(&reports, flags.format)?;

    if !failed.is_empty() {
        anyhow::bail!("collection failed for: {}", failed.join(", "));
    }
    Ok(())
}

/// One cycle of `kind` on a fresh task and connection.
pub async fn run_cycle(ctx: &AppContext, kind: CollectorKind) -> anyhow::Result<CycleReport> {
    let task = ctx.collector_task(kind).await?;
    let progress = CycleProgress::new(kind);

    match task.collect(&progress).await {
        Ok(report) => {
            progress.finish_ok(&format!(
                "done: {} created, {} deleted",
                report.total_created(),
                report.deleted
            ));
            Ok(report)
        }
        Err(error) => {
            progress.finish_err("failed");
            Err(error).with_context(|| format!("{kind} collection cycle failed"))
        }
    }
}

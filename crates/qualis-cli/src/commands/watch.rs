use std::time::Duration;

use anyhow::Context;
use qualis_client::SonarClientSelector;
use qualis_collector::CollectorTask;
use qualis_core::enums::CollectorKind;
use tokio::time::MissedTickBehavior;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WatchArgs;
use crate::commands::shared::for_each_kind;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::CycleProgress;

/// Handle `qualis watch`.
///
/// Each kind gets one task for the whole session and its own ticker; a
/// cycle that outlasts the interval delays the next tick, so cycles of one
/// kind never overlap. Failed cycles are logged and retried on the next tick.
pub async fn handle(args: &WatchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let secs = args
        .interval_secs
        .unwrap_or(ctx.config.general.watch_interval_secs);
    if secs == 0 {
        anyhow::bail!("watch interval must be at least one second");
    }
    let period = Duration::from_secs(secs);
    tracing::info!(interval_secs = secs, "watching");

    let loops = for_each_kind(args.kind, |kind| watch_kind(ctx, kind, period, flags));

    tokio::select! {
        results = loops => {
            for (kind, result) in results {
                result.with_context(|| format!("{kind} watch stopped"))?;
            }
            Ok(())
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            tracing::info!("interrupted; stopping watch");
            Ok(())
        }
    }
}

/// Only returns when the task cannot be built or output cannot be written.
async fn watch_kind(
    ctx: &AppContext,
    kind: CollectorKind,
    period: Duration,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let task: CollectorTask<SonarClientSelector> = ctx.collector_task(kind).await?;
    tracing::debug!(%kind, cron = task.cron(), "collector task ready");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let progress = CycleProgress::new(kind);
        match task.collect(&progress).await {
            Ok(report) => {
                progress.finish_ok("done");
                output(&report, flags.format)?;
            }
            Err(error) => {
                progress.finish_err("failed");
                tracing::error!(%kind, %error, "collection cycle failed; retrying next tick");
            }
        }
    }
}

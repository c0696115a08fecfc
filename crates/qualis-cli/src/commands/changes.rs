use anyhow::Context;
use qualis_core::entities::ConfigChangeRecord;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ChangesArgs;
use crate::context::{AppContext, CollectorScope};
use crate::output::output;

/// Handle `qualis changes`. Newest first.
pub async fn handle(args: &ChangesArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let scope = ctx.scope(args.kind).await?;
    if scope == CollectorScope::Unregistered {
        return output(&Vec::<ConfigChangeRecord>::new(), flags.format);
    }

    let changes = ctx
        .store
        .list_config_changes(scope.collector_id(), args.limit)
        .await
        .context("failed to list config changes")?;
    output(&changes, flags.format)
}

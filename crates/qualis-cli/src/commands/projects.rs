use anyhow::Context;
use qualis_core::entities::Project;
use qualis_db::repos::project::ProjectFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProjectsArgs;
use crate::context::{AppContext, CollectorScope};
use crate::output::output;

/// Handle `qualis projects`.
pub async fn handle(args: &ProjectsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let scope = ctx.scope(args.kind).await?;
    if scope == CollectorScope::Unregistered {
        return output(&Vec::<Project>::new(), flags.format);
    }

    let filter = ProjectFilter {
        collector_id: scope.collector_id().map(String::from),
        enabled: args.enabled.then_some(true),
        instance_url: args.server.clone(),
    };
    let projects = ctx
        .store
        .list_projects(&filter)
        .await
        .context("failed to list projects")?;
    output(&projects, flags.format)
}

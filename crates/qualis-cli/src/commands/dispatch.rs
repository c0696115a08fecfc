use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Collect(args) => commands::collect::handle(&args, ctx, flags).await,
        Commands::Watch(args) => commands::watch::handle(&args, ctx, flags).await,
        Commands::Projects(args) => commands::projects::handle(&args, ctx, flags).await,
        Commands::Changes(args) => commands::changes::handle(&args, ctx, flags).await,
        Commands::Snapshots(args) => commands::snapshots::handle(&args, ctx, flags).await,
        Commands::Schema(_) | Commands::Config => {
            unreachable!("schema/config are pre-dispatched in main")
        }
    }
}

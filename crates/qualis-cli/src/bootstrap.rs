use anyhow::Context;
use qualis_config::QualisConfig;

use crate::cli::GlobalFlags;

/// Load `.env` from the working directory, then the layered config.
///
/// `--config` replaces the discovered user and project files; `QUALIS_*`
/// environment variables still win over it.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<QualisConfig> {
    load_dotenv()?;

    match &flags.config {
        Some(path) => QualisConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => QualisConfig::load().context("failed to load qualis configuration"),
    }
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

use qualis_config::QualisConfig;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `qualis config`: the effective configuration, secrets masked.
pub fn handle(config: &QualisConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&config.redacted(), flags.format)
}

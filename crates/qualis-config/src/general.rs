//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default pause between watch cycles, in seconds.
const fn default_watch_interval_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Pause between two cycles of the same collector kind in `qualis watch`.
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            watch_interval_secs: default_watch_interval_secs(),
        }
    }
}

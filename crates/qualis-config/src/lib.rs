//! # qualis-config
//!
//! Layered configuration loading for Qualis using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`QUALIS_*` prefix, `__` as separator)
//! 2. Project-level `.qualis/config.toml`
//! 3. User-level `~/.config/qualis/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `QUALIS_SONAR__CRON` -> `sonar.cron` and
//! `QUALIS_DATABASE__PATH` -> `database.path`. List values use TOML array
//! syntax: `QUALIS_SONAR__URLS='["https://a", "https://b"]'`.
//!
//! ```no_run
//! use qualis_config::QualisConfig;
//!
//! let config = QualisConfig::load_with_dotenv().expect("config");
//! for server in config.sonar.server_entries() {
//!     println!("{}", server.url);
//! }
//! ```

mod database;
mod error;
mod general;
mod sonar;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use sonar::SonarConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "QUALIS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QualisConfig {
    #[serde(default)]
    pub sonar: SonarConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl QualisConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse or a
    /// value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading a `.env` file, if one is found.
    ///
    /// # Errors
    ///
    /// See [`QualisConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration from an explicit file instead of the discovered
    /// user and project files. Environment variables still win.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `path` does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".qualis/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Copy with every secret masked, for `qualis config show`.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            sonar: self.sonar.redacted(),
            ..self.clone()
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qualis").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (at most to the workspace root),
    /// then falls back to the current directory. Missing `.env` is not an error.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

use std::time::Duration;

use anyhow::Context;
use qualis_client::{MetricLists, SonarClientSelector};
use qualis_collector::CollectorTask;
use qualis_config::QualisConfig;
use qualis_core::enums::CollectorKind;
use qualis_db::service::QualisService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: QualisConfig,
    /// Connection for read-only commands. Collection cycles open their own.
    pub store: QualisService,
}

/// Which collector a listing command is narrowed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorScope {
    All,
    One(String),
    /// The kind was requested but has never run; nothing can match.
    Unregistered,
}

impl CollectorScope {
    #[must_use]
    pub fn collector_id(&self) -> Option<&str> {
        match self {
            Self::One(id) => Some(id),
            Self::All | Self::Unregistered => None,
        }
    }
}

impl AppContext {
    pub async fn init(config: QualisConfig) -> anyhow::Result<Self> {
        let store = open_store(&config).await?;
        Ok(Self { config, store })
    }

    /// A collector task for `kind` with its own database connection.
    ///
    /// The server list is snapshotted from the loaded configuration.
    pub async fn collector_task(
        &self,
        kind: CollectorKind,
    ) -> anyhow::Result<CollectorTask<SonarClientSelector>> {
        let sonar = &self.config.sonar;
        sonar
            .validate()
            .context("invalid [sonar] configuration")?;
        if !sonar.is_configured() {
            tracing::warn!(%kind, "no servers configured; every unpushed project will be deleted");
        }

        let selector = SonarClientSelector::new(
            MetricLists {
                quality: sonar.static_metrics_63_and_above.clone(),
                security: sonar.security_metrics_63_and_above.clone(),
                legacy: sonar.metrics_before_63.clone(),
            },
            Duration::from_secs(sonar.request_timeout_secs),
        );
        let store = open_store(&self.config).await?;

        Ok(CollectorTask::new(
            kind,
            sonar.cron.clone(),
            sonar.server_entries(),
            selector,
            store,
        ))
    }

    pub async fn scope(&self, kind: Option<CollectorKind>) -> anyhow::Result<CollectorScope> {
        let Some(kind) = kind else {
            return Ok(CollectorScope::All);
        };
        let collector = self
            .store
            .find_collector(kind)
            .await
            .with_context(|| format!("failed to look up the {kind} collector"))?;
        Ok(collector.map_or(CollectorScope::Unregistered, |c| CollectorScope::One(c.id)))
    }
}

async fn open_store(config: &QualisConfig) -> anyhow::Result<QualisService> {
    QualisService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))
}

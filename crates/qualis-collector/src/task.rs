//! The per-kind collector task handed to the scheduling harness.

use qualis_client::ClientSelector;
use qualis_core::entities::Collector;
use qualis_core::enums::CollectorKind;
use qualis_core::servers::ServerEntry;
use qualis_db::service::QualisService;

use crate::error::CollectorError;

/// One collector kind with its server list, client selector and store.
///
/// The server list is an immutable snapshot taken when the task is built;
/// every cycle sees the same credentials.
pub struct CollectorTask<S> {
    kind: CollectorKind,
    cron: String,
    servers: Vec<ServerEntry>,
    selector: S,
    store: QualisService,
}

impl<S: ClientSelector> CollectorTask<S> {
    #[must_use]
    pub const fn new(
        kind: CollectorKind,
        cron: String,
        servers: Vec<ServerEntry>,
        selector: S,
        store: QualisService,
    ) -> Self {
        Self {
            kind,
            cron,
            servers,
            selector,
            store,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> CollectorKind {
        self.kind
    }

    /// Cron expression for the scheduling harness.
    #[must_use]
    pub fn cron(&self) -> &str {
        &self.cron
    }

    #[must_use]
    pub fn servers(&self) -> &[ServerEntry] {
        &self.servers
    }

    #[must_use]
    pub const fn store(&self) -> &QualisService {
        &self.store
    }

    pub(crate) const fn selector(&self) -> &S {
        &self.selector
    }

    /// The registered collector for this kind, carrying the task's servers.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Database`] if registration fails.
    pub async fn collector(&self) -> Result<Collector, CollectorError> {
        let mut collector = self.store.ensure_collector(self.kind).await?;
        collector.servers.clone_from(&self.servers);
        Ok(collector)
    }
}

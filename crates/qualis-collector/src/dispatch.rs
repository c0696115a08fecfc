//! One collection cycle: enablement sync, then each server in order
//! (version, inventory, delta, refresh, audit), then the deletion pass.

use chrono::Utc;

use qualis_client::{ClientSelector, QualityClient, RemoteProject};
use qualis_core::entities::{Collector, Project};
use qualis_core::servers::Credentials;

use crate::audit::{AuditSummary, record_config_changes};
use crate::enablement::sync_enablement;
use crate::error::{CollectorError, remote};
use crate::reconcile::{apply_delta, delete_stale, plan_delta};
use crate::refresh::refresh_snapshots;
use crate::report::{CycleReport, ServerReport};
use crate::task::CollectorTask;

/// Receives per-server progress. Servers are numbered from 1.
pub trait ProgressSink {
    fn server_started(&self, _index: usize, _total: usize, _instance_url: &str) {}
    fn server_finished(&self, _index: usize, _total: usize, _report: &ServerReport) {}
}

/// Discards progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {}

impl<S: ClientSelector> CollectorTask<S> {
    /// Run one full cycle.
    ///
    /// Servers are processed strictly in order. A version or inventory
    /// failure aborts the rest of the cycle, including the deletion pass.
    /// Config-change audit failures are logged: a failed profile listing
    /// skips the server's audit, a failed profile skips only that profile.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError`] for any failure other than a remote
    /// failure of the config-change audit.
    pub async fn collect(&self, progress: &impl ProgressSink) -> Result<CycleReport, CollectorError> {
        let started_at = Utc::now();
        let collector = self.collector().await?;
        tracing::info!(
            collector = %collector.name,
            servers = collector.servers.len(),
            "cycle started"
        );

        let mut existing = self
            .store()
            .find_projects_by_collector_ids(&[collector.id.as_str()])
            .await?;
        let state_changes = sync_enablement(self.store(), &collector, &mut existing).await?;

        let total = collector.servers.len();
        let mut latest = Vec::new();
        let mut servers = Vec::with_capacity(total);
        for (i, server) in collector.servers.iter().enumerate() {
            let index = i + 1;
            progress.server_started(index, total, &server.url);

            let credentials = server.credentials();
            let report = self
                .collect_server(&collector, &server.url, &credentials, &mut existing, &mut latest)
                .await?;
            tracing::info!(
                collector = %collector.name,
                instance_url = %report.instance_url,
                version = %report.version,
                fetched = report.fetched,
                created = report.created,
                updated = report.updated,
                refreshed = report.refreshed,
                audited = report.audited,
                audit_failed_profiles = report.audit_failed_profiles,
                "server collected"
            );
            progress.server_finished(index, total, &report);
            servers.push(report);
        }

        let deleted = delete_stale(self.store(), &collector, &latest, &mut existing).await?;
        if deleted > 0 {
            tracing::info!(collector = %collector.name, deleted, "stale projects deleted");
        }

        let finished_at = Utc::now();
        self.store().mark_executed(&collector.id, finished_at).await?;

        Ok(CycleReport {
            kind: collector.kind,
            collector_id: collector.id,
            state_changes,
            servers,
            deleted,
            started_at,
            finished_at,
        })
    }

    async fn collect_server(
        &self,
        collector: &Collector,
        instance_url: &str,
        credentials: &Credentials,
        existing: &mut Vec<Project>,
        latest: &mut Vec<RemoteProject>,
    ) -> Result<ServerReport, CollectorError> {
        let version = self
            .selector()
            .resolve_version(instance_url, credentials)
            .await
            .map_err(remote(instance_url))?;
        let client = self
            .selector()
            .client_for(version, credentials)
            .map_err(remote(instance_url))?;

        let inventory = client
            .list_projects(instance_url)
            .await
            .map_err(remote(instance_url))?;

        let delta = plan_delta(collector, &inventory, existing);
        let (created, updated) = apply_delta(self.store(), delta, existing).await?;

        let refreshed = refresh_snapshots(self.store(), &client, collector, instance_url).await?;

        let (audit, audit_skipped) = if version.supports_changelog() {
            match record_config_changes(self.store(), &client, collector, instance_url).await {
                Ok(summary) => (summary, false),
                Err(CollectorError::Remote { source, .. }) => {
                    tracing::warn!(instance_url, error = %source, "config-change audit failed");
                    (AuditSummary::default(), true)
                }
                Err(other) => return Err(other),
            }
        } else {
            tracing::debug!(instance_url, %version, "server predates changelogs; audit skipped");
            (AuditSummary::default(), true)
        };

        let report = ServerReport {
            instance_url: instance_url.to_string(),
            version: version.to_string(),
            fetched: inventory.len(),
            created,
            updated,
            refreshed,
            audited: audit.recorded,
            audit_failed_profiles: audit.failed_profiles,
            audit_skipped,
        };
        latest.extend(inventory);
        Ok(report)
    }
}

//! Config-change audit: quality-profile changelog events become deduplicated
//! [`ConfigChangeRecord`]s.

use qualis_client::sonar::parse_server_date;
use qualis_client::{ProfileChangeEvent, QualityClient};
use qualis_core::entities::{Collector, ConfigChangeRecord};
use qualis_core::enums::ConfigOperation;
use qualis_db::service::QualisService;

use crate::error::{CollectorError, remote};

/// Build a record from one changelog event.
///
/// Returns `None` when the event has no parseable date.
pub fn event_to_record(collector_id: &str, event: ProfileChangeEvent) -> Option<ConfigChangeRecord> {
    let timestamp = event.date.as_deref().and_then(parse_server_date)?;
    Some(ConfigChangeRecord {
        id: String::new(),
        collector_id: collector_id.to_string(),
        user_name: event.author_name,
        user_login: event.author_login,
        operation: ConfigOperation::from_action(event.action.as_deref().unwrap_or_default()),
        timestamp,
        change: serde_json::json!({ "event": event.raw }),
    })
}

fn same_key(a: &ConfigChangeRecord, b: &ConfigChangeRecord) -> bool {
    a.collector_id == b.collector_id
        && a.user_login == b.user_login
        && a.operation == b.operation
        && a.timestamp == b.timestamp
}

/// Outcome of one server's audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// Records persisted across all profiles.
    pub recorded: usize,
    /// Profiles whose association or changelog call failed.
    pub failed_profiles: usize,
}

/// Fetch every profile's changelog from `instance_url` and persist the
/// events not seen before. Profiles with no associated project are skipped.
///
/// Each profile is saved as soon as it is deduplicated. A remote failure on
/// one profile is logged and counted; the remaining profiles still run.
///
/// # Errors
///
/// Returns [`CollectorError::Remote`] when the profile listing fails and
/// [`CollectorError::Database`] when the store does.
pub async fn record_config_changes<C: QualityClient>(
    store: &QualisService,
    client: &C,
    collector: &Collector,
    instance_url: &str,
) -> Result<AuditSummary, CollectorError> {
    let profiles = client
        .list_quality_profiles(instance_url)
        .await
        .map_err(remote(instance_url))?;

    let mut summary = AuditSummary::default();
    for profile in profiles {
        match audit_profile(store, client, collector, instance_url, &profile.key).await {
            Ok(recorded) => summary.recorded += recorded,
            Err(CollectorError::Remote { source, .. }) => {
                tracing::warn!(
                    instance_url,
                    profile = %profile.key,
                    error = %source,
                    "profile changelog failed"
                );
                summary.failed_profiles += 1;
            }
            Err(other) => return Err(other),
        }
    }
    Ok(summary)
}

async fn audit_profile<C: QualityClient>(
    store: &QualisService,
    client: &C,
    collector: &Collector,
    instance_url: &str,
    profile_key: &str,
) -> Result<usize, CollectorError> {
    let associated = client
        .projects_for_profile(instance_url, profile_key)
        .await
        .map_err(remote(instance_url))?;
    if !associated.is_some_and(|projects| !projects.is_empty()) {
        return Ok(0);
    }

    let events = client
        .profile_changes(instance_url, profile_key)
        .await
        .map_err(remote(instance_url))?;

    let mut queued: Vec<ConfigChangeRecord> = Vec::new();
    for event in events {
        let date = event.date.clone();
        let Some(record) = event_to_record(&collector.id, event) else {
            tracing::warn!(
                instance_url,
                profile = profile_key,
                date = ?date,
                "skipping change event with unparseable date"
            );
            continue;
        };
        if queued.iter().any(|q| same_key(q, &record)) {
            continue;
        }
        let stored = store
            .find_config_changes(
                &record.collector_id,
                record.user_login.as_deref(),
                record.operation,
                record.timestamp,
            )
            .await?;
        if stored.is_empty() {
            queued.push(record);
        }
    }

    store.save_config_changes(&mut queued).await?;
    Ok(queued.len())
}

//! Snapshot refresh for the enabled projects of one server.

use chrono::Utc;

use qualis_client::QualityClient;
use qualis_core::entities::{Collector, Project, QualitySnapshot};
use qualis_db::service::QualisService;

use crate::error::{CollectorError, remote};

/// Fetch the current snapshot of every enabled project on `instance_url` and
/// append those whose timestamp differs from the latest stored one.
///
/// Refreshed projects get `last_updated` stamped; project updates and
/// snapshot appends are one batch each.
///
/// # Errors
///
/// Returns [`CollectorError::Remote`] if a snapshot fetch fails and
/// [`CollectorError::Database`] if the store does.
pub async fn refresh_snapshots<C: QualityClient>(
    store: &QualisService,
    client: &C,
    collector: &Collector,
    instance_url: &str,
) -> Result<usize, CollectorError> {
    let enabled = store.find_enabled_projects(&collector.id, instance_url).await?;

    let mut touched: Vec<Project> = Vec::new();
    let mut snapshots: Vec<QualitySnapshot> = Vec::new();
    for mut project in enabled {
        let Some(snapshot) = client
            .fetch_quality(&project, collector.kind)
            .await
            .map_err(remote(instance_url))?
        else {
            continue;
        };

        let latest = store.latest_snapshot_timestamp(&project.id).await?;
        if latest == Some(snapshot.timestamp) {
            continue;
        }

        project.last_updated = Some(Utc::now());
        touched.push(project);
        snapshots.push(snapshot);
    }

    store.save_projects(&mut touched).await?;
    store.append_snapshots(&mut snapshots).await?;
    Ok(snapshots.len())
}

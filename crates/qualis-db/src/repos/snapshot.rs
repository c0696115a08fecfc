//! Quality snapshot repository. Append-only.

use qualis_core::entities::QualitySnapshot;
use qualis_core::ids::PREFIX_SNAPSHOT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_json};
use crate::service::QualisService;

const SELECT_COLS: &str = "id, collector_item_id, timestamp, name, url, version, metrics";

fn row_to_snapshot(row: &libsql::Row) -> Result<QualitySnapshot, DatabaseError> {
    Ok(QualitySnapshot {
        id: row.get::<String>(0)?,
        collector_item_id: row.get::<String>(1)?,
        timestamp: row.get::<i64>(2)?,
        name: row.get::<String>(3)?,
        url: row.get::<String>(4)?,
        version: get_opt_string(row, 5)?,
        metrics: parse_json(&row.get::<String>(6)?)?,
    })
}

impl QualisService {
    /// Timestamp of the newest stored snapshot of a project, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn latest_snapshot_timestamp(
        &self,
        collector_item_id: &str,
    ) -> Result<Option<i64>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT MAX(timestamp) FROM quality_snapshots WHERE collector_item_id = ?1",
                [collector_item_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<Option<i64>>(0)?),
            None => Ok(None),
        }
    }

    /// Append a batch of snapshots in one transaction, assigning ids.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is committed then.
    pub async fn append_snapshots(
        &self,
        snapshots: &mut [QualitySnapshot],
    ) -> Result<(), DatabaseError> {
        if snapshots.is_empty() {
            return Ok(());
        }
        for snapshot in snapshots.iter_mut() {
            snapshot.id = self.db().generate_id(PREFIX_SNAPSHOT).await?;
        }

        let tx = self.db().conn().transaction().await?;
        for snapshot in snapshots.iter() {
            let metrics = serde_json::to_string(&snapshot.metrics)?;
            tx.execute(
                "INSERT INTO quality_snapshots (id, collector_item_id, timestamp, name, url, version, metrics)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    snapshot.id.as_str(),
                    snapshot.collector_item_id.as_str(),
                    snapshot.timestamp,
                    snapshot.name.as_str(),
                    snapshot.url.as_str(),
                    snapshot.version.as_deref(),
                    metrics
                ],
            )
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(count = snapshots.len(), "snapshots appended");
        Ok(())
    }

    /// Snapshots of one project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_snapshots(
        &self,
        collector_item_id: &str,
        limit: u32,
    ) -> Result<Vec<QualitySnapshot>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM quality_snapshots
                     WHERE collector_item_id = ?1 ORDER BY timestamp DESC LIMIT ?2"
                ),
                libsql::params![collector_item_id, i64::from(limit)],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_snapshot(&row)?);
        }
        Ok(results)
    }
}

//! Config-change audit repository.
//!
//! Records are deduplicated on `(collector_id, user_login, operation, timestamp)`.
//! A NULL login matches only NULL logins.

use qualis_core::entities::ConfigChangeRecord;
use qualis_core::enums::ConfigOperation;
use qualis_core::ids::PREFIX_CONFIG_CHANGE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum, parse_json};
use crate::service::QualisService;

const SELECT_COLS: &str = "id, collector_id, user_name, user_login, operation, timestamp, change";

fn row_to_change(row: &libsql::Row) -> Result<ConfigChangeRecord, DatabaseError> {
    Ok(ConfigChangeRecord {
        id: row.get::<String>(0)?,
        collector_id: row.get::<String>(1)?,
        user_name: get_opt_string(row, 2)?,
        user_login: get_opt_string(row, 3)?,
        operation: parse_enum(&row.get::<String>(4)?)?,
        timestamp: row.get::<i64>(5)?,
        change: parse_json(&row.get::<String>(6)?)?,
    })
}

impl QualisService {
    /// Existing records for one dedup key.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_config_changes(
        &self,
        collector_id: &str,
        user_login: Option<&str>,
        operation: ConfigOperation,
        timestamp: i64,
    ) -> Result<Vec<ConfigChangeRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM config_changes
                     WHERE collector_id = ?1 AND user_login IS ?2 AND operation = ?3 AND timestamp = ?4"
                ),
                libsql::params![collector_id, user_login, operation.as_str(), timestamp],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_change(&row)?);
        }
        Ok(results)
    }

    /// Persist a batch of records in one transaction, assigning ids.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is committed then.
    pub async fn save_config_changes(
        &self,
        records: &mut [ConfigChangeRecord],
    ) -> Result<(), DatabaseError> {
        if records.is_empty() {
            return Ok(());
        }
        for record in records.iter_mut() {
            record.id = self.db().generate_id(PREFIX_CONFIG_CHANGE).await?;
        }

        let tx = self.db().conn().transaction().await?;
        for record in records.iter() {
            let change = serde_json::to_string(&record.change)?;
            tx.execute(
                "INSERT INTO config_changes (id, collector_id, user_name, user_login, operation, timestamp, change)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    record.id.as_str(),
                    record.collector_id.as_str(),
                    record.user_name.as_deref(),
                    record.user_login.as_deref(),
                    record.operation.as_str(),
                    record.timestamp,
                    change
                ],
            )
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(count = records.len(), "config changes saved");
        Ok(())
    }

    /// Most recent records, optionally for one collector.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_config_changes(
        &self,
        collector_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ConfigChangeRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM config_changes
                     WHERE (?1 IS NULL OR collector_id = ?1)
                     ORDER BY timestamp DESC LIMIT ?2"
                ),
                libsql::params![collector_id, i64::from(limit)],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_change(&row)?);
        }
        Ok(results)
    }
}

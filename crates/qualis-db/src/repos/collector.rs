//! Collector registration repository.

use chrono::{DateTime, Utc};

use qualis_core::entities::Collector;
use qualis_core::enums::CollectorKind;
use qualis_core::ids::PREFIX_COLLECTOR;

use crate::error::DatabaseError;
use crate::helpers::{parse_enum, parse_optional_datetime};
use crate::service::QualisService;

const SELECT_COLS: &str = "id, name, kind, last_executed";

fn row_to_collector(row: &libsql::Row) -> Result<Collector, DatabaseError> {
    let last_executed = row.get::<Option<String>>(3)?;
    Ok(Collector {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        last_executed: parse_optional_datetime(last_executed.as_deref())?,
        servers: Vec::new(),
    })
}

impl QualisService {
    /// Look up the collector registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_collector(
        &self,
        kind: CollectorKind,
    ) -> Result<Option<Collector>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM collectors WHERE kind = ?1"),
                [kind.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_collector(&row)?)),
            None => Ok(None),
        }
    }

    /// Return the collector for `kind`, registering it on first use.
    ///
    /// The returned value carries no servers; callers attach the configured
    /// server list for the cycle.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the lookup or insert fails.
    pub async fn ensure_collector(&self, kind: CollectorKind) -> Result<Collector, DatabaseError> {
        if let Some(existing) = self.find_collector(kind).await? {
            return Ok(existing);
        }

        let id = self.db().generate_id(PREFIX_COLLECTOR).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO collectors (id, name, kind) VALUES (?1, ?2, ?3)
                 ON CONFLICT(kind) DO NOTHING",
                libsql::params![id.as_str(), kind.collector_name(), kind.as_str()],
            )
            .await?;

        // A concurrent writer may have won the insert.
        let collector = self
            .find_collector(kind)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        tracing::info!(collector = %collector.name, id = %collector.id, "collector registered");
        Ok(collector)
    }

    /// Stamp the collector's last successful cycle.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no collector has this id.
    pub async fn mark_executed(
        &self,
        collector_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE collectors SET last_executed = ?1 WHERE id = ?2",
                libsql::params![at.to_rfc3339(), collector_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "collector",
                id: collector_id.to_string(),
            });
        }
        Ok(())
    }

    /// All registered collectors, ordered by kind.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_collectors(&self) -> Result<Vec<Collector>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM collectors ORDER BY kind"),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_collector(&row)?);
        }
        Ok(results)
    }
}

//! # qualis-db
//!
//! libSQL record store for Qualis.
//!
//! Holds collector registrations, tracked projects, quality snapshots,
//! config-change audit records and dashboard components. Each collector kind
//! opens its own connection to the same database file; `busy_timeout` lets two
//! concurrent cycles wait on each other's write transactions instead of failing.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Milliseconds a writer waits for a competing write transaction.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Central database handle.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct QualisDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl QualisDb {
    /// Open a local database at the given path, or `:memory:`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:"
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::InvalidState(format!("cannot create '{}': {e}", parent.display()))
            })?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        // Both pragmas report their new value as a row.
        conn.query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
        if path != ":memory:" {
            conn.query("PRAGMA journal_mode = WAL", ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA journal_mode: {e}")))?;
        }

        let qualis_db = Self { db, conn };
        qualis_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(qualis_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"prj-a3f8b2c1"`.
    ///
    /// Snapshot and config-change ids carry 8 random bytes, the rest 4
    /// (see [`qualis_core::ids::random_bytes`]).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let bytes = qualis_core::ids::random_bytes(prefix);
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob({bytes})))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

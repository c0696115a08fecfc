//! Service layer hosting every repository method.
//!
//! `QualisService` wraps `QualisDb`; the repos in [`crate::repos`] are
//! implemented as `impl QualisService` blocks. Batched writes run inside one
//! libSQL transaction each.

use crate::QualisDb;
use crate::error::DatabaseError;

pub struct QualisService {
    db: QualisDb,
}

impl QualisService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = QualisDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    #[must_use]
    pub const fn from_db(db: QualisDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &QualisDb {
        &self.db
    }
}

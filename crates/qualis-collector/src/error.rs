//! Collector error types.

use qualis_client::ClientError;
use qualis_db::error::DatabaseError;
use thiserror::Error;

/// Errors that abort (or, for the config-change audit, skip) part of a cycle.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// A remote call to one server failed.
    #[error("server {instance_url}: {source}")]
    Remote {
        instance_url: String,
        #[source]
        source: ClientError,
    },

    /// The record store rejected a read or write.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Attach the server URL to a client error.
pub(crate) fn remote(instance_url: &str) -> impl FnOnce(ClientError) -> CollectorError + '_ {
    move |source| CollectorError::Remote {
        instance_url: instance_url.to_string(),
        source,
    }
}

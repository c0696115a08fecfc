//! Remote client error types.

use thiserror::Error;

/// Errors that can occur when talking to a quality server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a server response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The version endpoint returned something that is not `major.minor[...]`.
    #[error("unrecognized server version: '{0}'")]
    InvalidVersion(String),

    /// The server returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

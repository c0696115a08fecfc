//! Cross-cutting error types for Qualis.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `ClientError`) are defined in
//! their respective crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Qualis crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A string could not be mapped onto a known enum variant.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

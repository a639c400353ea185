//! Error types for the PostgreSQL adapter.

use oxide_sqlblock::BuildError;
use thiserror::Error;

/// Errors raised while rendering and running a template.
#[derive(Debug, Error)]
pub enum PgError {
    /// The template could not be rendered.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An array parameter cannot be mapped to a PostgreSQL array type.
    #[error("unsupported array parameter ${position}: {reason}")]
    UnsupportedArray {
        /// 1-based placeholder position.
        position: usize,
        /// What is wrong with the array.
        reason: &'static str,
    },
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, PgError>;

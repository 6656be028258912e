//! Gateway error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RdsError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(#[from] sqlx::Error),
}

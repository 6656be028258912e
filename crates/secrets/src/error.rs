//! Secrets error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretsError {
    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    /// The secret exists but carries no string payload.
    #[error("secret {0} has no secret string")]
    MissingValue(String),

    /// The secret string is not the expected JSON shape.
    #[error("failed to parse secret {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required configuration key missing: {0}")]
    MissingKey(String),
}

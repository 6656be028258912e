//! AWS Secrets Manager retrieval for pipeline jobs.
//!
//! Secrets are stored as JSON documents; [`SecretsClient::get_secret`]
//! returns the parsed payload and [`SecretsClient::get_db_secret`] maps the
//! conventional database-credential shape into a typed [`DbSecret`].

pub mod client;
pub mod error;
pub mod secret;

pub use client::SecretsClient;
pub use error::SecretsError;
pub use secret::DbSecret;

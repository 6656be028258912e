//! Secrets Manager client wrapper.

use aws_config::BehaviorVersion;
use tracing::info;

use etlkit_core::AwsConfig;

use crate::error::SecretsError;
use crate::secret::DbSecret;

/// Client for fetching JSON secrets from AWS Secrets Manager.
pub struct SecretsClient {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsClient {
    /// Create a new [`SecretsClient`] for the configured region.
    ///
    /// An explicit `endpoint_url` in the config overrides the service
    /// endpoint (local development against a Secrets Manager emulator).
    pub async fn new(aws: &AwsConfig) -> Self {
        let region = aws_sdk_secretsmanager::config::Region::new(aws.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&aws_cfg);
        if let Some(endpoint) = aws.endpoint_url.as_deref().filter(|u| !u.is_empty()) {
            builder = builder.endpoint_url(endpoint);
        }

        let client = aws_sdk_secretsmanager::Client::from_conf(builder.build());

        Self { client }
    }

    /// Fetch a secret and parse its string payload as JSON.
    pub async fn get_secret(&self, secret_name: &str) -> Result<serde_json::Value, SecretsError> {
        let resp = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| SecretsError::AwsSdk(e.to_string()))?;

        let secret_string = resp
            .secret_string()
            .ok_or_else(|| SecretsError::MissingValue(secret_name.to_string()))?;

        let value: serde_json::Value =
            serde_json::from_str(secret_string).map_err(|source| SecretsError::Parse {
                name: secret_name.to_string(),
                source,
            })?;

        info!(secret = %secret_name, "Secret retrieved");

        Ok(value)
    }

    /// Fetch a secret holding database credentials.
    pub async fn get_db_secret(&self, secret_name: &str) -> Result<DbSecret, SecretsError> {
        let resp = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| SecretsError::AwsSdk(e.to_string()))?;

        let secret_string = resp
            .secret_string()
            .ok_or_else(|| SecretsError::MissingValue(secret_name.to_string()))?;

        let secret: DbSecret =
            serde_json::from_str(secret_string).map_err(|source| SecretsError::Parse {
                name: secret_name.to_string(),
                source,
            })?;

        info!(secret = %secret_name, database = %secret.url(), "Database secret retrieved");

        Ok(secret)
    }
}

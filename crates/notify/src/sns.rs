//! SNS topic notifier.
//!
//! Publishes job-status messages to a configured SNS topic. The payload is
//! rendered as indented JSON with keys in insertion order, matching what
//! email subscribers of the topic expect to read.

use aws_config::BehaviorVersion;
use indexmap::IndexMap;
use tracing::info;

use etlkit_core::AwsConfig;

use crate::traits::{clamp_subject, Notification, Notifier, NotifyError};

/// Sends notifications by publishing to an SNS topic.
pub struct SnsNotifier {
    sns_client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsNotifier {
    /// Create a new [`SnsNotifier`] publishing to the given topic.
    pub async fn new(aws: &AwsConfig, topic_arn: &str) -> Self {
        let region = aws_sdk_sns::config::Region::new(aws.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_sns::config::Builder::from(&aws_cfg);
        if let Some(endpoint) = aws.endpoint_url.as_deref().filter(|u| !u.is_empty()) {
            builder = builder.endpoint_url(endpoint);
        }

        let sns_client = aws_sdk_sns::Client::from_conf(builder.build());

        Self {
            sns_client,
            topic_arn: topic_arn.to_string(),
        }
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

/// Render the ordered payload as indented JSON.
pub fn render_json_body(body: &IndexMap<String, String>) -> Result<String, NotifyError> {
    serde_json::to_string_pretty(body).map_err(|e| NotifyError::Transport(e.to_string()))
}

#[async_trait::async_trait]
impl Notifier for SnsNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let subject = clamp_subject(&notification.subject);
        let message = render_json_body(&notification.body)?;

        self.sns_client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(&subject)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!(
            channel = "sns",
            topic = %self.topic_arn,
            subject = %subject,
            "notification delivered"
        );

        Ok(())
    }

    /// Returns `"sns"`.
    fn channel_name(&self) -> &str {
        "sns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_preserves_key_order() {
        let mut body = IndexMap::new();
        body.insert("Batch ID".to_string(), "20240301093015".to_string());
        body.insert("Config No".to_string(), "3".to_string());
        body.insert("Job Name".to_string(), "daily_load".to_string());

        let json = render_json_body(&body).unwrap();
        let batch = json.find("Batch ID").unwrap();
        let config = json.find("Config No").unwrap();
        let job = json.find("Job Name").unwrap();
        assert!(batch < config && config < job, "got: {json}");
    }

    #[test]
    fn json_body_is_indented() {
        let mut body = IndexMap::new();
        body.insert("Details".to_string(), "The job started execution.".to_string());

        let json = render_json_body(&body).unwrap();
        assert!(json.contains("\n  \"Details\""), "got: {json}");
    }
}

//! Notifier trait definition and shared error types.

use indexmap::IndexMap;
use tracing::info;

/// Longest subject a channel will transmit; longer subjects are trimmed.
pub const SUBJECT_MAX_CHARS: usize = 99;

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A job-status message ready for delivery.
///
/// The body is an ordered key/value payload; renderers preserve insertion
/// order so downstream consumers see fields in a stable sequence.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    pub subject: String,
    pub body: IndexMap<String, String>,
}

/// Clamp a subject to [`SUBJECT_MAX_CHARS`] characters before transmission.
pub fn clamp_subject(subject: &str) -> String {
    if subject.chars().count() > SUBJECT_MAX_CHARS {
        info!(
            limit = SUBJECT_MAX_CHARS,
            "Subject too long, trimming before send"
        );
        subject.chars().take(SUBJECT_MAX_CHARS).collect()
    } else {
        subject.to_string()
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "sns", "email").
    fn channel_name(&self) -> &str;
}

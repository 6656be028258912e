//! Job-status notification channels.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - SNS topic and SMTP email notifier implementations
//! - Subject clamping shared by every channel

pub mod email;
pub mod sns;
pub mod traits;

pub use email::EmailNotifier;
pub use sns::SnsNotifier;
pub use traits::{clamp_subject, Notification, Notifier, NotifyError, SUBJECT_MAX_CHARS};

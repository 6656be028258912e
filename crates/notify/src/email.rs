//! SMTP email notifier via `lettre`.
//!
//! Delivers job-status messages as plain-text emails through a relay,
//! with To and Cc recipient lists. The body renders the ordered payload
//! as one `key : value` line per field.

use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use etlkit_core::SmtpConfig;

use crate::traits::{clamp_subject, Notification, Notifier, NotifyError};

/// Sends notifications as emails via SMTP.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` from SMTP configuration.
    ///
    /// Requires a parseable sender and at least one recipient. STARTTLS is
    /// used when `config.tls` is set; otherwise the connection is plain
    /// (internal relays). SMTP credentials are resolved from the
    /// `SMTP_USERNAME` and `SMTP_PASSWORD` environment variables when both
    /// are present.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.sender)?;
        let to = parse_mailboxes(&config.recipients)?;
        let cc = parse_mailboxes(&config.cc_recipients)?;

        if to.is_empty() {
            return Err(NotifyError::Config(
                "at least one recipient is required".to_string(),
            ));
        }

        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(config.port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
                .port(config.port)
        };

        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
            cc,
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))
}

fn parse_mailboxes(addresses: &[String]) -> Result<Vec<Mailbox>, NotifyError> {
    addresses.iter().map(|addr| parse_mailbox(addr)).collect()
}

/// Render the ordered payload as `key : value` lines.
fn render_text_body(notification: &Notification) -> String {
    notification
        .body
        .iter()
        .map(|(key, value)| format!("{key} : {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    /// Send a notification email to all configured recipients.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let subject = clamp_subject(&notification.subject);

        let mut message_builder = Message::builder().from(self.from.clone());
        for recipient in &self.to {
            message_builder = message_builder.to(recipient.clone());
        }
        for recipient in &self.cc {
            message_builder = message_builder.cc(recipient.clone());
        }

        let email = message_builder
            .subject(&subject)
            .body(render_text_body(notification))
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        info!(
            channel = "email",
            subject = %subject,
            recipients = self.to.len(),
            cc = self.cc.len(),
            "notification delivered"
        );

        Ok(())
    }

    /// Returns `"email"`.
    fn channel_name(&self) -> &str {
        "email"
    }
}

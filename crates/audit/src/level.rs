//! Notification verbosity levels.

use std::fmt;

use crate::status::RunStatus;

/// Verbosity gate controlling which state transitions notify:
/// - `None`: no notifications
/// - `Info`: all notifications
/// - `Warning`: only warning and error notifications
/// - `Error`: only error notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationLevel {
    #[default]
    None,
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Resolve the effective level from configuration.
    ///
    /// Without a configured channel the level is forced to `None`. The
    /// configured string is matched case-insensitively; anything outside
    /// the known set falls back to `None`.
    pub fn resolve(channel_configured: bool, configured: Option<&str>) -> Self {
        if !channel_configured {
            return NotificationLevel::None;
        }

        match configured.unwrap_or("none").to_lowercase().as_str() {
            "info" => NotificationLevel::Info,
            "warning" => NotificationLevel::Warning,
            "error" => NotificationLevel::Error,
            _ => NotificationLevel::None,
        }
    }

    /// Whether a transition to `status` should notify at this level.
    pub fn allows(&self, status: RunStatus) -> bool {
        match status {
            RunStatus::InProgress | RunStatus::Successful => {
                matches!(self, NotificationLevel::Info)
            }
            RunStatus::Warned => {
                matches!(self, NotificationLevel::Info | NotificationLevel::Warning)
            }
            RunStatus::Failed => matches!(
                self,
                NotificationLevel::Info | NotificationLevel::Warning | NotificationLevel::Error
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::None => "none",
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

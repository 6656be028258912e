use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_opt(key) {
        Some(v) => matches!(v.as_str(), "true" | "1"),
        None => default,
    }
}

fn env_list(key: &str) -> Vec<String> {
    env_opt(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

// ── Job arguments ─────────────────────────────────────────────

/// Identity and audit-log destination for one job execution.
///
/// Glue passes these as resolved job arguments; `from_args` consumes that
/// map directly. `from_env` covers local runs where the same keys are set
/// as environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job_name: String,
    pub job_run_id: String,
    /// Schema holding the audit log table.
    pub log_schema: String,
    /// Audit log table name.
    pub log_table: String,
    /// SNS topic for job-status notifications. Absent or empty means no
    /// notification channel is configured.
    pub sns_topic_arn: Option<String>,
    /// Requested verbosity: one of none|info|warning|error, case-insensitive.
    pub notification_level: Option<String>,
}

impl JobConfig {
    /// Build from a Glue-style argument map. The four identity keys are
    /// required; a missing one is fatal.
    pub fn from_args(args: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<String, ConfigError> {
            args.get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
        };
        let optional = |key: &str| args.get(key).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            job_name: required("JOB_NAME")?,
            job_run_id: required("JOB_RUN_ID")?,
            log_schema: required("log_schema")?,
            log_table: required("log_table")?,
            sns_topic_arn: optional("sns_topic_arn"),
            notification_level: optional("notification_level"),
        })
    }

    /// Build from environment variables using the same keys as `from_args`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<String, ConfigError> {
            env_opt(key).ok_or_else(|| ConfigError::MissingKey(key.to_string()))
        };

        Ok(Self {
            job_name: required("JOB_NAME")?,
            job_run_id: required("JOB_RUN_ID")?,
            log_schema: required("log_schema")?,
            log_table: required("log_table")?,
            sns_topic_arn: env_opt("sns_topic_arn"),
            notification_level: env_opt("notification_level"),
        })
    }

    /// True when a non-empty SNS topic ARN is present.
    pub fn has_notification_channel(&self) -> bool {
        self.sns_topic_arn.as_deref().is_some_and(|arn| !arn.is_empty())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Job config loaded:");
        tracing::info!("  job:          {} (run {})", self.job_name, self.job_run_id);
        tracing::info!("  audit log:    {}.{}", self.log_schema, self.log_table);
        tracing::info!(
            "  notification: level={}, channel={}",
            self.notification_level.as_deref().unwrap_or("none"),
            if self.has_notification_channel() { "sns" } else { "(none)" }
        );
    }
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    pub fn from_env() -> Self {
        Self {
            region: env_or("AWS_REGION", "ap-southeast-1"),
            endpoint_url: env_opt("AWS_ENDPOINT_URL"),
        }
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl PostgresConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("PG_HOST", "localhost"),
            port: env_u16("PG_PORT", 5432),
            database: env_or("PG_DATABASE", "etl"),
            username: env_opt("PG_USERNAME"),
            password: env_opt("PG_PASSWORD"),
            ssl_mode: env_or("PG_SSL_MODE", "prefer"),
            max_connections: env_u32("PG_MAX_CONNECTIONS", 5),
        }
    }

    pub fn connection_string(&self) -> String {
        let user = self.username.as_deref().unwrap_or("postgres");
        let pass = self.password.as_deref().unwrap_or("");
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            user, pass, self.host, self.port, self.database, self.ssl_mode
        )
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

// ── SMTP ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub sender: String,
    pub recipients: Vec<String>,
    pub cc_recipients: Vec<String>,
    /// Use STARTTLS when connecting. Plain relays on port 25 leave this off.
    pub tls: bool,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        Self {
            server: env_or("SMTP_SERVER", ""),
            port: env_u16("SMTP_PORT", 25),
            sender: env_or("SMTP_SENDER", ""),
            recipients: env_list("SMTP_RECIPIENTS"),
            cc_recipients: env_list("SMTP_CC_RECIPIENTS"),
            tls: env_bool("SMTP_TLS", false),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.server.is_empty() && !self.sender.is_empty() && !self.recipients.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env-based tests must run serially to avoid interfering with each other.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        let keys = [
            "JOB_NAME",
            "JOB_RUN_ID",
            "log_schema",
            "log_table",
            "sns_topic_arn",
            "notification_level",
            "PG_HOST",
            "PG_PORT",
            "PG_DATABASE",
            "PG_USERNAME",
            "PG_PASSWORD",
            "PG_SSL_MODE",
            "PG_MAX_CONNECTIONS",
            "SMTP_SERVER",
            "SMTP_PORT",
            "SMTP_SENDER",
            "SMTP_RECIPIENTS",
            "SMTP_CC_RECIPIENTS",
            "SMTP_TLS",
            "AWS_REGION",
            "AWS_ENDPOINT_URL",
        ];
        for k in keys {
            env::remove_var(k);
        }
    }

    fn base_args() -> HashMap<String, String> {
        HashMap::from([
            ("JOB_NAME".to_string(), "daily_load".to_string()),
            ("JOB_RUN_ID".to_string(), "jr_001".to_string()),
            ("log_schema".to_string(), "audit".to_string()),
            ("log_table".to_string(), "job_log".to_string()),
        ])
    }

    #[test]
    fn from_args_reads_required_keys() {
        let cfg = JobConfig::from_args(&base_args()).unwrap();
        assert_eq!(cfg.job_name, "daily_load");
        assert_eq!(cfg.job_run_id, "jr_001");
        assert_eq!(cfg.log_schema, "audit");
        assert_eq!(cfg.log_table, "job_log");
        assert!(cfg.sns_topic_arn.is_none());
        assert!(cfg.notification_level.is_none());
    }

    #[test]
    fn from_args_missing_key_is_fatal() {
        let mut args = base_args();
        args.remove("JOB_RUN_ID");

        let err = JobConfig::from_args(&args).unwrap_err();
        assert!(err.to_string().contains("JOB_RUN_ID"), "got: {err}");
    }

    #[test]
    fn from_args_empty_required_key_is_fatal() {
        let mut args = base_args();
        args.insert("log_table".to_string(), String::new());

        assert!(JobConfig::from_args(&args).is_err());
    }

    #[test]
    fn empty_topic_arn_counts_as_absent() {
        let mut args = base_args();
        args.insert("sns_topic_arn".to_string(), String::new());

        let cfg = JobConfig::from_args(&args).unwrap();
        assert!(cfg.sns_topic_arn.is_none());
        assert!(!cfg.has_notification_channel());
    }

    #[test]
    fn topic_arn_enables_notification_channel() {
        let mut args = base_args();
        args.insert(
            "sns_topic_arn".to_string(),
            "arn:aws:sns:ap-southeast-1:123456789012:job-status".to_string(),
        );

        let cfg = JobConfig::from_args(&args).unwrap();
        assert!(cfg.has_notification_channel());
    }

    #[test]
    fn from_env_reads_same_keys() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("JOB_NAME", "nightly");
        env::set_var("JOB_RUN_ID", "jr_9");
        env::set_var("log_schema", "audit");
        env::set_var("log_table", "job_log");
        env::set_var("notification_level", "Warning");

        let cfg = JobConfig::from_env().unwrap();
        assert_eq!(cfg.job_name, "nightly");
        assert_eq!(cfg.notification_level.as_deref(), Some("Warning"));

        clear_env();
    }

    #[test]
    fn from_env_missing_key_is_fatal() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("JOB_NAME", "nightly");

        assert!(JobConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    fn postgres_defaults_and_connection_string() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        let cfg = PostgresConfig::from_env();
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 5432);
        assert!(!cfg.is_configured());
        assert_eq!(
            cfg.connection_string(),
            "postgres://postgres:@localhost:5432/etl?sslmode=prefer"
        );

        clear_env();
    }

    #[test]
    fn postgres_reads_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("PG_HOST", "db.internal");
        env::set_var("PG_PORT", "6432");
        env::set_var("PG_USERNAME", "etl_user");

        let cfg = PostgresConfig::from_env();
        assert_eq!(cfg.host, "db.internal");
        assert_eq!(cfg.port, 6432);
        assert!(cfg.is_configured());

        clear_env();
    }

    #[test]
    fn smtp_recipient_list_parsing() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("SMTP_SERVER", "mail.internal");
        env::set_var("SMTP_SENDER", "etl@example.com");
        env::set_var("SMTP_RECIPIENTS", "a@example.com, b@example.com,");

        let cfg = SmtpConfig::from_env();
        assert_eq!(cfg.recipients, vec!["a@example.com", "b@example.com"]);
        assert!(cfg.cc_recipients.is_empty());
        assert!(cfg.is_configured());

        clear_env();
    }
}

//! Processing of one database/table pair within a job run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, warn};

use etlkit_notify::{Notification, Notifier};
use etlkit_rds::{SqlGateway, SqlValue, TIMESTAMP_FORMAT};

use crate::error::AuditError;
use crate::job::JobRun;
use crate::level::NotificationLevel;
use crate::status::RunStatus;

/// Audit trail for one table processed within a job run.
///
/// Beginning a table run inserts an IN-PROGRESS audit row. Each terminal
/// method updates that row, addressed by the
/// `(batch_id, job_name, job_run_id, database_name, table_name)` tuple,
/// and notifies the job's channel when its level allows. Calling a second
/// terminal method overwrites the first outcome (last write wins).
pub struct TableRun {
    job_name: String,
    job_run_id: String,
    batch_id: String,
    log_schema: String,
    log_table: String,
    level: NotificationLevel,
    store: Arc<dyn SqlGateway>,
    notifier: Option<Arc<dyn Notifier>>,
    database_name: String,
    table_name: String,
    config_no: i32,
    start_time: DateTime<Utc>,
    status: RunStatus,
}

impl TableRun {
    /// Begin tracking one table: insert the IN-PROGRESS audit row and
    /// notify if the job's level covers run starts.
    pub async fn begin(
        job: &JobRun,
        database_name: &str,
        table_name: &str,
        config_no: i32,
    ) -> Result<Self, AuditError> {
        Self::begin_with(job, database_name, table_name, config_no, None, None).await
    }

    /// [`begin`](Self::begin) with an overridden notification subject
    /// and/or details text.
    pub async fn begin_with(
        job: &JobRun,
        database_name: &str,
        table_name: &str,
        config_no: i32,
        subject: Option<&str>,
        details: Option<&str>,
    ) -> Result<Self, AuditError> {
        let run = Self {
            job_name: job.job_name().to_string(),
            job_run_id: job.job_run_id().to_string(),
            batch_id: job.batch_id().to_string(),
            log_schema: job.log_schema().to_string(),
            log_table: job.log_table().to_string(),
            level: job.level(),
            store: job.store(),
            notifier: job.notifier(),
            database_name: database_name.to_string(),
            table_name: table_name.to_string(),
            config_no,
            start_time: Utc::now(),
            status: RunStatus::InProgress,
        };

        let mut row = IndexMap::new();
        row.insert("start_time".to_string(), SqlValue::from(run.start_time));
        row.insert("batch_id".to_string(), SqlValue::from(run.batch_id.as_str()));
        row.insert("config_no".to_string(), SqlValue::from(run.config_no));
        row.insert("job_name".to_string(), SqlValue::from(run.job_name.as_str()));
        row.insert(
            "job_run_id".to_string(),
            SqlValue::from(run.job_run_id.as_str()),
        );
        row.insert(
            "database_name".to_string(),
            SqlValue::from(run.database_name.as_str()),
        );
        row.insert(
            "table_name".to_string(),
            SqlValue::from(run.table_name.as_str()),
        );
        row.insert(
            "job_status".to_string(),
            SqlValue::from(RunStatus::InProgress.as_str()),
        );
        row.insert(
            "last_modified_timestamp".to_string(),
            SqlValue::from(Utc::now()),
        );

        let rows_affected = run
            .store
            .insert_row(&run.log_schema, &run.log_table, &row)
            .await?;

        debug!(
            database = %run.database_name,
            table = %run.table_name,
            rows_affected,
            "Audit row inserted"
        );

        run.notify(RunStatus::InProgress, subject, details, None, None)
            .await?;

        Ok(run)
    }

    /// Mark this table run WARNED. Returns the affected-row count.
    pub async fn warning(
        &mut self,
        warning_message: &str,
        subject: Option<&str>,
        details: Option<&str>,
    ) -> Result<u64, AuditError> {
        self.finish(
            RunStatus::Warned,
            Some(warning_message),
            IndexMap::new(),
            subject,
            details,
        )
        .await
    }

    /// Mark this table run FAILED. Returns the affected-row count.
    pub async fn error(
        &mut self,
        error_message: &str,
        subject: Option<&str>,
        details: Option<&str>,
    ) -> Result<u64, AuditError> {
        self.finish(
            RunStatus::Failed,
            Some(error_message),
            IndexMap::new(),
            subject,
            details,
        )
        .await
    }

    /// Mark this table run SUCCESSFUL. `extra_fields` are merged into the
    /// update's set clause after the base fields, so callers can record
    /// outcome columns (row counts and the like); on a key collision the
    /// caller's value wins. Returns the affected-row count.
    pub async fn success(
        &mut self,
        extra_fields: IndexMap<String, SqlValue>,
        subject: Option<&str>,
        details: Option<&str>,
    ) -> Result<u64, AuditError> {
        self.finish(RunStatus::Successful, None, extra_fields, subject, details)
            .await
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn config_no(&self) -> i32 {
        self.config_no
    }

    async fn finish(
        &mut self,
        status: RunStatus,
        message: Option<&str>,
        extra_fields: IndexMap<String, SqlValue>,
        subject: Option<&str>,
        details: Option<&str>,
    ) -> Result<u64, AuditError> {
        if self.status.is_terminal() {
            warn!(
                database = %self.database_name,
                table = %self.table_name,
                previous = %self.status,
                next = %status,
                "Terminal transition repeated, overwriting previous outcome"
            );
        }

        let end_time = Utc::now();

        let mut set_values = IndexMap::new();
        set_values.insert("job_status".to_string(), SqlValue::from(status.as_str()));
        if let Some(message) = message {
            set_values.insert("error_message".to_string(), SqlValue::from(message));
        }
        set_values.insert("end_time".to_string(), SqlValue::from(end_time));
        set_values.insert(
            "last_modified_timestamp".to_string(),
            SqlValue::from(Utc::now()),
        );
        set_values.extend(extra_fields);

        let filter_conditions = self.identity_filter();

        let rows_affected = self
            .store
            .update_row(
                &self.log_schema,
                &self.log_table,
                &set_values,
                &filter_conditions,
            )
            .await?;

        debug!(
            database = %self.database_name,
            table = %self.table_name,
            status = %status,
            rows_affected,
            "Audit row updated"
        );

        self.status = status;

        self.notify(status, subject, details, Some(end_time), message)
            .await?;

        Ok(rows_affected)
    }

    /// The tuple uniquely addressing this run's audit row.
    fn identity_filter(&self) -> IndexMap<String, SqlValue> {
        let mut filter = IndexMap::new();
        filter.insert(
            "batch_id".to_string(),
            SqlValue::from(self.batch_id.as_str()),
        );
        filter.insert(
            "job_name".to_string(),
            SqlValue::from(self.job_name.as_str()),
        );
        filter.insert(
            "job_run_id".to_string(),
            SqlValue::from(self.job_run_id.as_str()),
        );
        filter.insert(
            "database_name".to_string(),
            SqlValue::from(self.database_name.as_str()),
        );
        filter.insert(
            "table_name".to_string(),
            SqlValue::from(self.table_name.as_str()),
        );
        filter
    }

    async fn notify(
        &self,
        status: RunStatus,
        subject: Option<&str>,
        details: Option<&str>,
        end_time: Option<DateTime<Utc>>,
        message: Option<&str>,
    ) -> Result<(), AuditError> {
        if !self.level.allows(status) {
            return Ok(());
        }
        let Some(notifier) = &self.notifier else {
            return Ok(());
        };

        let subject = match subject {
            Some(s) => s.to_string(),
            None => format!("{}: {} for config:{}", status, self.job_name, self.config_no),
        };

        let details = match details {
            Some(d) => d.to_string(),
            None => default_details(status, message),
        };

        let start_time = self.start_time.format(TIMESTAMP_FORMAT).to_string();
        let end_time = match end_time {
            Some(t) if status != RunStatus::InProgress => {
                t.format(TIMESTAMP_FORMAT).to_string()
            }
            _ => String::new(),
        };

        let mut body = IndexMap::new();
        body.insert("Batch ID".to_string(), self.batch_id.clone());
        body.insert("Config No".to_string(), self.config_no.to_string());
        body.insert("Job Name".to_string(), self.job_name.clone());
        body.insert("Job Run ID".to_string(), self.job_run_id.clone());
        body.insert("Database".to_string(), self.database_name.clone());
        body.insert("Table".to_string(), self.table_name.clone());
        body.insert("Job Start Time".to_string(), start_time);
        body.insert("Job End Time".to_string(), end_time);
        body.insert("Details".to_string(), details);

        notifier.send(&Notification { subject, body }).await?;

        Ok(())
    }
}

fn default_details(status: RunStatus, message: Option<&str>) -> String {
    match status {
        RunStatus::InProgress => "The job started execution.".to_string(),
        RunStatus::Warned => format!(
            "The job completed/failed with warning: {}.",
            message.unwrap_or_default()
        ),
        RunStatus::Failed => format!(
            "The job failed with error: {}",
            message.unwrap_or_default()
        ),
        RunStatus::Successful => "The job completed execution with no warnings/errors.".to_string(),
    }
}

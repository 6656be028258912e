//! One execution of a batch job.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use etlkit_core::JobConfig;
use etlkit_notify::Notifier;
use etlkit_rds::SqlGateway;

use crate::level::NotificationLevel;

/// Batch IDs are the job start time in compact fixed-width form.
pub const BATCH_ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// Identity and shared handles for one job execution.
///
/// Immutable after construction; every [`TableRun`](crate::TableRun) under
/// this job aliases its identity, gateway and notifier.
pub struct JobRun {
    job_name: String,
    job_run_id: String,
    start_time: DateTime<Utc>,
    batch_id: String,
    log_schema: String,
    log_table: String,
    level: NotificationLevel,
    store: Arc<dyn SqlGateway>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl JobRun {
    /// Create the run record for one job execution.
    ///
    /// The effective notification level is resolved from the injected
    /// channel and the configured level string: a job without a channel
    /// never notifies, and when the resolved level is `none` the channel
    /// handle is dropped so nothing downstream can send through it.
    pub fn new(
        config: &JobConfig,
        store: Arc<dyn SqlGateway>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let start_time = Utc::now();
        let batch_id = start_time.format(BATCH_ID_FORMAT).to_string();

        let level = NotificationLevel::resolve(
            notifier.is_some(),
            config.notification_level.as_deref(),
        );
        let notifier = match level {
            NotificationLevel::None => None,
            _ => notifier,
        };

        info!(
            job_name = %config.job_name,
            job_run_id = %config.job_run_id,
            batch_id = %batch_id,
            notification_level = %level,
            "Job run started"
        );

        Self {
            job_name: config.job_name.clone(),
            job_run_id: config.job_run_id.clone(),
            start_time,
            batch_id,
            log_schema: config.log_schema.clone(),
            log_table: config.log_table.clone(),
            level,
            store,
            notifier,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn job_run_id(&self) -> &str {
        &self.job_run_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn log_schema(&self) -> &str {
        &self.log_schema
    }

    pub fn log_table(&self) -> &str {
        &self.log_table
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    pub(crate) fn store(&self) -> Arc<dyn SqlGateway> {
        Arc::clone(&self.store)
    }

    pub(crate) fn notifier(&self) -> Option<Arc<dyn Notifier>> {
        self.notifier.as_ref().map(Arc::clone)
    }
}

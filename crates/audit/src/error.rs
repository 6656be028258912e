//! Audit error types.

use thiserror::Error;

use etlkit_notify::NotifyError;
use etlkit_rds::RdsError;

/// Failures surfaced by audit-log operations. Both kinds propagate to the
/// caller; nothing is swallowed.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit store error: {0}")]
    Store(#[from] RdsError),

    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),
}

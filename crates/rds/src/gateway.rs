//! The persistence seam and its sqlx implementation.

use async_trait::async_trait;
use indexmap::IndexMap;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use etlkit_core::PostgresConfig;
use etlkit_secrets::DbSecret;

use crate::error::RdsError;
use crate::sql::{build_insert, build_update};
use crate::value::SqlValue;

/// Narrow relational seam: insert or update one row by schema, table and
/// ordered column map. Implementations must tolerate concurrent independent
/// calls; no synchronization is added above this trait.
#[async_trait]
pub trait SqlGateway: Send + Sync {
    /// Insert a row. Returns the affected-row count.
    async fn insert_row(
        &self,
        schema: &str,
        table: &str,
        columns: &IndexMap<String, SqlValue>,
    ) -> Result<u64, RdsError>;

    /// Update rows matching the AND-ed filter conditions. Returns the
    /// affected-row count.
    async fn update_row(
        &self,
        schema: &str,
        table: &str,
        set_values: &IndexMap<String, SqlValue>,
        filter_conditions: &IndexMap<String, SqlValue>,
    ) -> Result<u64, RdsError>;

    /// Execute a raw DML statement. Returns the affected-row count.
    async fn execute_dml(&self, sql: &str) -> Result<u64, RdsError>;
}

/// sqlx-backed [`SqlGateway`] over a Postgres pool.
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    /// Connect using explicit connection settings.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, RdsError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.connection_string())
            .await
            .map_err(|e| RdsError::Connection(e.to_string()))?;

        info!(
            host = %config.host,
            database = %config.database,
            "PostgreSQL connection established"
        );

        Ok(Self { pool })
    }

    /// Connect using credentials fetched from Secrets Manager.
    pub async fn from_secret(secret: &DbSecret, max_connections: u32) -> Result<Self, RdsError> {
        let url = format!(
            "postgres://{}:{}@{}:{}/{}",
            secret.username, secret.password, secret.host, secret.port, secret.dbname
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(&url)
            .await
            .map_err(|e| RdsError::Connection(e.to_string()))?;

        info!(database = %secret.url(), "PostgreSQL connection established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (shared with other components of the job).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SqlGateway for PgGateway {
    async fn insert_row(
        &self,
        schema: &str,
        table: &str,
        columns: &IndexMap<String, SqlValue>,
    ) -> Result<u64, RdsError> {
        self.execute_dml(&build_insert(schema, table, columns)).await
    }

    async fn update_row(
        &self,
        schema: &str,
        table: &str,
        set_values: &IndexMap<String, SqlValue>,
        filter_conditions: &IndexMap<String, SqlValue>,
    ) -> Result<u64, RdsError> {
        self.execute_dml(&build_update(schema, table, set_values, filter_conditions))
            .await
    }

    async fn execute_dml(&self, sql: &str) -> Result<u64, RdsError> {
        info!(sql = %sql, "Executing DML statement");

        let result = sqlx::query(sql).execute(&self.pool).await?;
        let rows_affected = result.rows_affected();

        info!(rows_affected, "DML statement executed");

        Ok(rows_affected)
    }
}

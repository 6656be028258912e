//! Glue-catalog table metadata via AWS Athena.
//!
//! Provides [`AthenaCatalog`] for looking up table metadata, column lists
//! and table existence from the data catalog, with SDK types mapped into
//! owned result structs.

use aws_config::BehaviorVersion;
use tracing::{debug, info};

use etlkit_core::AwsConfig;

/// Default data catalog queried when none is named.
pub const DEFAULT_CATALOG: &str = "AwsDataCatalog";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur during catalog lookups.
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    /// The table does not exist in the catalog.
    #[error("table {database}.{table} not found in catalog")]
    TableNotFound { database: String, table: String },

    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
    pub data_type: Option<String>,
    pub comment: Option<String>,
}

/// Catalog metadata for one table.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    pub name: String,
    pub table_type: Option<String>,
    pub columns: Vec<TableColumn>,
    pub partition_keys: Vec<TableColumn>,
    pub parameters: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Catalog client
// ---------------------------------------------------------------------------

/// Client for table-metadata lookups against a data catalog.
pub struct AthenaCatalog {
    athena_client: aws_sdk_athena::Client,
    catalog_name: String,
}

impl AthenaCatalog {
    /// Create a new [`AthenaCatalog`] against the default catalog.
    pub async fn new(aws: &AwsConfig) -> Self {
        Self::with_catalog(aws, DEFAULT_CATALOG).await
    }

    /// Create a new [`AthenaCatalog`] against a named catalog.
    pub async fn with_catalog(aws: &AwsConfig, catalog_name: &str) -> Self {
        let region = aws_sdk_athena::config::Region::new(aws.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_athena::config::Builder::from(&aws_cfg);
        if let Some(endpoint) = aws.endpoint_url.as_deref().filter(|u| !u.is_empty()) {
            builder = builder.endpoint_url(endpoint);
        }

        let athena_client = aws_sdk_athena::Client::from_conf(builder.build());

        info!(
            region = %aws.region,
            catalog = %catalog_name,
            "AthenaCatalog initialised"
        );

        Self {
            athena_client,
            catalog_name: catalog_name.to_string(),
        }
    }

    /// Fetch metadata for a table.
    ///
    /// Returns [`AthenaError::TableNotFound`] when the catalog has no such
    /// table; any other SDK failure propagates as [`AthenaError::AwsSdk`].
    pub async fn get_table_metadata(
        &self,
        database: &str,
        table: &str,
    ) -> Result<TableMetadata, AthenaError> {
        let resp = self
            .athena_client
            .get_table_metadata()
            .catalog_name(&self.catalog_name)
            .database_name(database)
            .table_name(table)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_metadata_exception() {
                    AthenaError::TableNotFound {
                        database: database.to_string(),
                        table: table.to_string(),
                    }
                } else {
                    AthenaError::AwsSdk(service_err.to_string())
                }
            })?;

        let meta = resp.table_metadata().ok_or_else(|| AthenaError::TableNotFound {
            database: database.to_string(),
            table: table.to_string(),
        })?;

        let metadata = TableMetadata {
            name: meta.name().to_string(),
            table_type: meta.table_type().map(str::to_string),
            columns: meta.columns().iter().map(map_column).collect(),
            partition_keys: meta.partition_keys().iter().map(map_column).collect(),
            parameters: meta
                .parameters()
                .map(|params| {
                    params
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        };

        debug!(
            database = %database,
            table = %table,
            columns = metadata.columns.len(),
            "Fetched table metadata"
        );

        Ok(metadata)
    }

    /// Columns of a table, in catalog order.
    pub async fn get_table_columns(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<TableColumn>, AthenaError> {
        Ok(self.get_table_metadata(database, table).await?.columns)
    }

    /// Column names of a table, in catalog order.
    pub async fn get_table_column_names(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<String>, AthenaError> {
        Ok(self
            .get_table_columns(database, table)
            .await?
            .into_iter()
            .map(|column| column.name)
            .collect())
    }

    /// Whether the table exists in the catalog.
    ///
    /// Only a not-found lookup maps to `Ok(false)`; transport and
    /// permission failures propagate.
    pub async fn table_exists(&self, database: &str, table: &str) -> Result<bool, AthenaError> {
        match self.get_table_metadata(database, table).await {
            Ok(_) => Ok(true),
            Err(AthenaError::TableNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn map_column(column: &aws_sdk_athena::types::Column) -> TableColumn {
    TableColumn {
        name: column.name().to_string(),
        data_type: column.r#type().map(str::to_string),
        comment: column.comment().map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// Tests — no AWS calls
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = AthenaError::TableNotFound {
            database: "sales".into(),
            table: "orders".into(),
        };
        assert_eq!(err.to_string(), "table sales.orders not found in catalog");

        let err = AthenaError::AwsSdk("throttled".into());
        assert!(err.to_string().contains("throttled"));
    }

    #[test]
    fn map_column_carries_all_fields() {
        let sdk_column = aws_sdk_athena::types::Column::builder()
            .name("order_id")
            .r#type("bigint")
            .comment("primary key")
            .build()
            .unwrap();

        let column = map_column(&sdk_column);
        assert_eq!(column.name, "order_id");
        assert_eq!(column.data_type.as_deref(), Some("bigint"));
        assert_eq!(column.comment.as_deref(), Some("primary key"));
    }
}

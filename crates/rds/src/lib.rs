//! PostgreSQL persistence gateway for pipeline jobs.
//!
//! This crate provides:
//! - [`SqlValue`], a tagged literal model for column values
//! - Pure INSERT/UPDATE statement builders over ordered column maps
//! - [`SqlGateway`], the narrow async seam other crates write through
//! - [`PgGateway`], the sqlx-backed implementation

pub mod error;
pub mod gateway;
pub mod sql;
pub mod value;

pub use error::RdsError;
pub use gateway::{PgGateway, SqlGateway};
pub use sql::{build_insert, build_update};
pub use value::{SqlValue, TIMESTAMP_FORMAT};

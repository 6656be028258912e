pub mod catalog;

pub use catalog::{AthenaCatalog, AthenaError, TableColumn, TableMetadata};

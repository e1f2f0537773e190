//! Antenna Catalog - product catalog crawler
//!
//! Crawls a vendor's antenna catalog, normalizes its irregular HTML tables
//! into rectangular [`domain::TableModel`]s, and exports category and product
//! records as JSON, optionally uploading every table to SQLite.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{CatalogUseCases, RunSummary};
pub use domain::{CategoryRecord, ProductRecord, TableModel, Thumbnail};

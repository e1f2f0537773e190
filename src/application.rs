//! Application layer module
//!
//! Use cases that drive a complete crawl run: crawl, export, upload.

pub mod catalog_use_cases;

pub use catalog_use_cases::{CatalogUseCases, RunSummary};

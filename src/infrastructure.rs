//! Infrastructure layer for fetching, parsing, and exporting the catalog
//!
//! This module provides the HTTP page source, HTML parsing, the crawl loop,
//! JSON export, the SQLite table upload, configuration and logging.

pub mod config;  // Configuration file and site constants
pub mod crawling;  // Sequential catalog crawler
pub mod database_connection;
pub mod http_client;
pub mod json_export;
pub mod logging;  // Logging infrastructure
pub mod parsing;  // Table pipeline and page parsers
pub mod parsing_error;  // Parsing error types
pub mod table_repository;  // Replace-semantics table upload

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, diamond};
pub use crawling::{CatalogCrawler, CrawlReport};
pub use database_connection::DatabaseConnection;
pub use http_client::{HttpClient, HttpClientConfig, PageSource};
pub use json_export::JsonExporter;
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, TableNormalizer, TablePolicy};
pub use table_repository::{TableRepository, sanitize_table_name};

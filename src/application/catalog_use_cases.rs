//! Catalog run use cases
//!
//! Coordinates the crawler, the JSON exporter and the optional table upload
//! for one run. Nothing persists between runs apart from the output files.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::infrastructure::{
    AppConfig, CatalogCrawler, CrawlReport, DatabaseConnection, JsonExporter, PageSource, TableRepository,
};

/// Outcome of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub categories: usize,
    pub products: usize,
    pub tables: usize,
    pub skipped_pages: usize,
    pub categories_path: PathBuf,
    pub products_path: PathBuf,
    /// SQL table names, empty when no database is configured
    pub uploaded_tables: Vec<String>,
}

/// High-level catalog use cases
pub struct CatalogUseCases {
    config: AppConfig,
}

impl CatalogUseCases {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Crawl the live site over HTTP, then export
    pub async fn run(&self) -> Result<RunSummary> {
        let crawler = CatalogCrawler::from_config(&self.config).context("Failed to set up crawler")?;
        let report = crawler.crawl().await?;
        self.export(&report).await
    }

    /// Crawl from any page source, then export
    pub async fn run_with_source<S: PageSource>(&self, source: S) -> Result<RunSummary> {
        let crawler = CatalogCrawler::new(source, &self.config.crawl, &self.config.parsing)?;
        let report = crawler.crawl().await?;
        self.export(&report).await
    }

    /// Write the JSON files and, when configured, upload every table
    pub async fn export(&self, report: &CrawlReport) -> Result<RunSummary> {
        let exporter = JsonExporter::from_config(&self.config.export);
        let categories_path = exporter.export_categories(&report.categories).await?.to_path_buf();
        let products_path = exporter.export_products(&report.products).await?.to_path_buf();

        let uploaded_tables = match &self.config.export.database_url {
            Some(url) => {
                let db = DatabaseConnection::new(url).await?;
                let names = TableRepository::new(db.pool().clone())
                    .replace_all(&report.tables)
                    .await
                    .context("Table upload failed")?;
                db.close().await;
                names
            }
            None => Vec::new(),
        };

        let summary = RunSummary {
            categories: report.categories.len(),
            products: report.products.len(),
            tables: report.tables.len(),
            skipped_pages: report.skipped_pages.len(),
            categories_path,
            products_path,
            uploaded_tables,
        };

        info!(
            "📊 Run complete: {} categories, {} products, {} tables ({} uploaded), {} pages skipped",
            summary.categories,
            summary.products,
            summary.tables,
            summary.uploaded_tables.len(),
            summary.skipped_pages
        );
        Ok(summary)
    }
}

//! Catalog crawler
//!
//! Walks root page -> category endpoints -> product pages strictly in order,
//! one request at a time. Unavailable pages are logged and skipped; a page
//! missing its required structure aborts the run.

use anyhow::{Context, Result};
use scraper::Html;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{CategoryRecord, ProductRecord, TableModel};
use crate::infrastructure::config::{AppConfig, CrawlConfig};
use crate::infrastructure::http_client::{HttpClient, PageSource};
use crate::infrastructure::parsing::{
    CategoryPage, CategoryPageParser, CategoryParseContext, ContextualParser, EndpointParser, ParsingConfig,
    ProductPageParser, ProductParseContext, parse_base_url,
};

/// Everything collected by one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub categories: Vec<CategoryRecord>,
    pub products: Vec<ProductRecord>,
    /// Every normalized table, in visit order
    pub tables: Vec<TableModel>,
    /// Category and product pages that could not be fetched
    pub skipped_pages: Vec<String>,
}

/// Sequential crawler over a page source
pub struct CatalogCrawler<S: PageSource> {
    source: S,
    root_url: String,
    base_url: Url,
    endpoint_parser: EndpointParser,
    category_parser: CategoryPageParser,
    product_parser: ProductPageParser,
    follow_product_links: bool,
    request_delay: Duration,
}

impl CatalogCrawler<HttpClient> {
    /// Crawler over HTTP built from the application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = HttpClient::from_http_config(&config.http)?;
        Self::new(client, &config.crawl, &config.parsing)
    }
}

impl<S: PageSource> CatalogCrawler<S> {
    pub fn new(source: S, crawl: &CrawlConfig, parsing: &ParsingConfig) -> Result<Self> {
        parsing.validate().context("Invalid parsing configuration")?;

        Ok(Self {
            source,
            root_url: crawl.root_url.clone(),
            base_url: parse_base_url(&parsing.base_url)?,
            endpoint_parser: EndpointParser::from_config(crawl).context("Invalid endpoint settings")?,
            category_parser: CategoryPageParser::from_config(parsing).context("Invalid table settings")?,
            product_parser: ProductPageParser::from_config(parsing).context("Invalid product page settings")?,
            follow_product_links: crawl.follow_product_links,
            request_delay: Duration::from_millis(crawl.request_delay_ms),
        })
    }

    /// Run the whole crawl
    pub async fn crawl(&self) -> Result<CrawlReport> {
        info!("🚀 Starting catalog crawl from {}", self.root_url);

        let root_body = self
            .fetch(&self.root_url)
            .await
            .with_context(|| format!("Failed to fetch root page {}", self.root_url))?;

        let endpoints = {
            let html = Html::parse_document(&root_body);
            self.endpoint_parser.parse(&html)
        };

        let mut report = CrawlReport::default();
        let mut visited = HashSet::new();

        for endpoint in endpoints {
            if !visited.insert(endpoint.clone()) {
                debug!("Already visited {}", endpoint);
                continue;
            }
            self.crawl_category(&endpoint, &mut report).await?;
        }

        info!(
            "✅ Crawl finished: {} categories, {} tables, {} products, {} pages skipped",
            report.categories.len(),
            report.tables.len(),
            report.products.len(),
            report.skipped_pages.len()
        );
        Ok(report)
    }

    async fn crawl_category(&self, url: &str, report: &mut CrawlReport) -> Result<()> {
        let body = match self.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("⚠️ Skipping category {}: {:#}", url, e);
                report.skipped_pages.push(url.to_string());
                return Ok(());
            }
        };

        let CategoryPage { title, tables } = {
            let html = Html::parse_document(&body);
            self.category_parser
                .parse_with_context(&html, &CategoryParseContext::new(url))?
        };
        info!("📂 Category: {} ({} tables)", title, tables.len());

        let mut category = CategoryRecord::new(title);
        for table in tables {
            debug!("Table: {} ({} rows)", table.title, table.rows.len());
            category.children.push(table.title.clone());

            if self.follow_product_links {
                for (index, link) in table.linked_rows() {
                    self.crawl_product(link, &table, index, report).await?;
                }
            }
            report.tables.push(table);
        }
        report.categories.push(category);
        Ok(())
    }

    async fn crawl_product(&self, url: &str, table: &TableModel, row: usize, report: &mut CrawlReport) -> Result<()> {
        let body = match self.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("⚠️ Skipping product {}: {:#}", url, e);
                report.skipped_pages.push(url.to_string());
                return Ok(());
            }
        };

        let context = ProductParseContext::new(url, self.base_url.clone()).with_source(table, row);
        let product = {
            let html = Html::parse_document(&body);
            self.product_parser.parse_with_context(&html, &context)?
        };

        debug!("Product: {} ({})", product.model, product.title);
        report.products.push(product);
        Ok(())
    }

    /// Fetch a page, then pause for the configured delay
    async fn fetch(&self, url: &str) -> Result<String> {
        let result = self.source.fetch_page(url).await;
        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }
        result
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

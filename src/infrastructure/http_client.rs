//! HTTP client for catalog crawling
//!
//! Requests are issued one at a time by the crawl loop, so the client carries
//! no rate limiter of its own; the crawler's `request_delay_ms` covers
//! politeness. Non-success statuses are errors and are never retried.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::infrastructure::config::HttpConfig;

/// Source of page bodies for the crawler
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Body of the page at `url`; non-success responses are errors
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    /// Request timeout; `None` keeps reqwest's default (no timeout)
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_http_config(config: &HttpConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout_seconds.map(Duration::from_secs),
            follow_redirects: config.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn from_http_config(config: &HttpConfig) -> Result<Self> {
        Self::with_config(HttpClientConfig::from_http_config(config))
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Issue a GET and fail on any non-success status
    pub async fn fetch_response(&self, url: &str) -> Result<Response> {
        info!("🌐 HTTP GET: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            error!("❌ HTTP error {}: {}", response.status(), url);
            return Err(anyhow!("HTTP error {}: {}", response.status(), url));
        }

        Ok(response)
    }

    /// Fetch a page body as text
    pub async fn fetch_html_string(&self, url: &str) -> Result<String> {
        let response = self.fetch_response(url).await?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetch_html_string(url).await
    }
}

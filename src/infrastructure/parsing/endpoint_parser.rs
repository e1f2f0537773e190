//! Endpoint discovery on the catalog root page

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, trace};
use url::Url;

use super::{ParsingResult, compile_pattern, parse_base_url};
use crate::infrastructure::config::CrawlConfig;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Finds category endpoints linked from the root page
#[derive(Debug, Clone)]
pub struct EndpointParser {
    root_url: Url,
    pattern: Regex,
    ignored_suffixes: Vec<String>,
}

impl EndpointParser {
    pub fn new(root_url: &str, pattern: &str, ignored_suffixes: &[String]) -> ParsingResult<Self> {
        Ok(Self {
            root_url: parse_base_url(root_url)?,
            pattern: compile_pattern(pattern)?,
            ignored_suffixes: ignored_suffixes.to_vec(),
        })
    }

    pub fn from_config(config: &CrawlConfig) -> ParsingResult<Self> {
        Self::new(&config.root_url, &config.endpoint_pattern, &config.ignored_endpoints)
    }

    /// Absolute endpoint URLs without fragments, in document order; duplicates
    /// are kept
    pub fn parse(&self, html: &Html) -> Vec<String> {
        let mut endpoints = Vec::new();

        for anchor in html.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            if !self.pattern.is_match(href) {
                continue;
            }

            if self.is_ignored(href) {
                trace!("Skipping ignored endpoint: {}", href);
                continue;
            }

            // In-page anchors point at the same category page
            match self.root_url.join(href.trim()) {
                Ok(mut url) => {
                    url.set_fragment(None);
                    endpoints.push(url.into());
                }
                Err(e) => debug!("Skipping endpoint {}: {}", href, e),
            }
        }

        debug!("Discovered {} endpoint links on {}", endpoints.len(), self.root_url);
        endpoints
    }

    fn is_ignored(&self, href: &str) -> bool {
        let path = href.split(['#', '?']).next().unwrap_or(href);
        self.ignored_suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
    }
}

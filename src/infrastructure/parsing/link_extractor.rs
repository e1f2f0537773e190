//! Link Extractor
//!
//! A catalog row links to its product page from the anchor in its first cell,
//! written relative to the catalog directory (`../x50a.html`).

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;
use url::Url;

use super::{ParsingResult, compile_pattern, resolve_url};

static FIRST_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid td selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Resolves the product link of each data row
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base_url: Url,
    pattern: Regex,
}

impl LinkExtractor {
    pub fn new(base_url: Url, pattern: &str) -> ParsingResult<Self> {
        Ok(Self {
            base_url,
            pattern: compile_pattern(pattern)?,
        })
    }

    /// One slot per row, `None` where the first cell has no matching anchor
    pub fn extract(&self, rows: &[ElementRef<'_>]) -> Vec<Option<String>> {
        rows.iter().map(|row| self.row_link(row)).collect()
    }

    /// Absolute product URL from the row's first `<td>` anchor
    pub fn row_link(&self, row: &ElementRef<'_>) -> Option<String> {
        let href = row.select(&FIRST_CELL).next()?.select(&ANCHOR).next()?.value().attr("href")?;

        if !self.pattern.is_match(href) {
            debug!("Ignoring non-catalog link: {}", href);
            return None;
        }

        match resolve_url(&self.base_url, href) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Dropping unresolvable link: {}", e);
                None
            }
        }
    }
}

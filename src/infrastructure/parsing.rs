//! HTML parsing infrastructure for the antenna catalog
//!
//! Page parsers (endpoint index, category pages, product pages) sit on top of
//! the table pipeline: locator, normalizer, caption resolver, link extractor
//! and the optional header reconciliation.

pub mod caption_resolver;
pub mod category_page_parser;
pub mod config;
pub mod context;
pub mod endpoint_parser;
pub mod header_reconciliation;
pub mod link_extractor;
pub mod product_page_parser;
pub mod table_locator;
pub mod table_normalizer;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use caption_resolver::resolve_caption;
pub use category_page_parser::{CategoryPage, CategoryPageParser};
pub use config::{ParsingConfig, TableLayout};
pub use context::{CategoryParseContext, ProductParseContext};
pub use endpoint_parser::EndpointParser;
pub use header_reconciliation::reconcile_header;
pub use link_extractor::LinkExtractor;
pub use product_page_parser::ProductPageParser;
pub use table_locator::locate_tables;
pub use table_normalizer::{TableNormalizer, TablePolicy};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parser over a whole document with page-specific context
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Compile a CSS selector, mapping failures into `ParsingError`
pub fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Compile a regex pattern, mapping failures into `ParsingError`
pub fn compile_pattern(pattern: &str) -> ParsingResult<Regex> {
    Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(pattern, e))
}

/// Parse a configured base URL
pub fn parse_base_url(base_url: &str) -> ParsingResult<Url> {
    Url::parse(base_url).map_err(|e| ParsingError::url_resolution_failed(base_url, e, None))
}

/// Resolve an href against a base URL
pub fn resolve_url(base_url: &Url, href: &str) -> ParsingResult<String> {
    base_url
        .join(href.trim())
        .map(String::from)
        .map_err(|e| ParsingError::url_resolution_failed(href, e, Some(base_url.as_str())))
}

/// Text content of an element with whitespace runs collapsed and trimmed
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Header cell label: each text node trimmed, joined without separators
///
/// A `<br>` between two words therefore vanishes from the label, which is how
/// the catalog's column names (`Stacked ElementPhasing/Wavelength`) read.
pub fn header_text(element: &ElementRef<'_>) -> String {
    element.text().map(collapse_whitespace).collect()
}

/// Collapse every whitespace run into one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_text_joins_trimmed_text_nodes() {
        let html = Html::parse_fragment("<table><tr><th> Stacked Element<br>\r\n Phasing/Wavelength </th></tr></table>");
        let th = html.select(&compile_selector("th").unwrap()).next().unwrap();
        assert_eq!(header_text(&th), "Stacked ElementPhasing/Wavelength");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  X50A \r\n  Dual\tBand "), "X50A Dual Band");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_element_text_joins_nested_nodes() {
        let html = Html::parse_fragment("<table><tr><td> 144/440 <br> MHz <b>Gain</b></td></tr></table>");
        let td = html.select(&compile_selector("td").unwrap()).next().unwrap();
        assert_eq!(element_text(&td), "144/440 MHz Gain");
    }

    #[test]
    fn test_url_resolution() {
        let base = parse_base_url("https://diamondantenna.net/").unwrap();
        assert_eq!(resolve_url(&base, "../x50a.html").unwrap(), "https://diamondantenna.net/x50a.html");
        assert_eq!(resolve_url(&base, "picts/x50a.jpg").unwrap(), "https://diamondantenna.net/picts/x50a.jpg");
        assert_eq!(resolve_url(&base, "https://other.com/test").unwrap(), "https://other.com/test");
    }

    #[test]
    fn test_invalid_inputs_map_to_parsing_errors() {
        assert!(matches!(compile_selector("td[["), Err(ParsingError::InvalidSelector { .. })));
        assert!(matches!(compile_pattern("(unclosed"), Err(ParsingError::InvalidPattern { .. })));
        assert!(matches!(parse_base_url("not a url"), Err(ParsingError::UrlResolutionFailed { .. })));
    }
}

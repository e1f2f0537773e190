//! Product page parser
//!
//! A product record joins the product page (title, photo) with the catalog
//! table row that linked to it (tagline, metadata, category).

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    ContextualParser, ParsingConfig, ParsingError, ParsingResult, ProductParseContext, collapse_whitespace,
    compile_pattern, element_text, resolve_url,
};
use crate::domain::{ProductRecord, Thumbnail};
use crate::infrastructure::config::diamond;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid h1 selector"));
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").expect("valid img selector"));

/// Parser for product pages
#[derive(Debug, Clone)]
pub struct ProductPageParser {
    thumbnail_pattern: Regex,
}

impl ProductPageParser {
    pub fn new(thumbnail_pattern: &str) -> ParsingResult<Self> {
        Ok(Self {
            thumbnail_pattern: compile_pattern(thumbnail_pattern)?,
        })
    }

    pub fn from_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Self::new(&config.thumbnail_pattern)
    }

    /// First image whose `src` matches the product photo pattern
    fn extract_thumbnail(&self, html: &Html, context: &ProductParseContext) -> Option<Thumbnail> {
        let image = html.select(&IMAGE).find(|img| {
            img.value()
                .attr("src")
                .is_some_and(|src| self.thumbnail_pattern.is_match(src))
        })?;
        let src = image.value().attr("src")?;

        match resolve_url(&context.base_url, src) {
            Ok(url) => Some(Thumbnail {
                alt: image.value().attr("alt").unwrap_or_default().to_string(),
                url,
            }),
            Err(e) => {
                warn!("Dropping thumbnail for {}: {}", context.url, e);
                None
            }
        }
    }
}

/// First whitespace-delimited token of the title
fn extract_model(title: &str) -> String {
    title.split_whitespace().next().unwrap_or_default().to_string()
}

/// `Description` cell, else the first phasing/wavelength column present
fn extract_tagline(context: &ProductParseContext) -> Option<String> {
    if context.has_column(diamond::DESCRIPTION_COLUMN) {
        return context.column(diamond::DESCRIPTION_COLUMN).map(ToString::to_string);
    }

    diamond::TAGLINE_FALLBACK_COLUMNS
        .iter()
        .find(|column| context.has_column(column))
        .and_then(|column| context.column(column))
        .map(collapse_whitespace)
}

/// Every column after the first, keyed by header label, unless the table has
/// a `Description` column
fn extract_metadata(context: &ProductParseContext) -> Map<String, Value> {
    let mut metadata = Map::new();
    if context.has_column(diamond::DESCRIPTION_COLUMN) {
        return metadata;
    }

    for (index, label) in context.header.iter().enumerate().skip(1) {
        let value = context
            .row
            .get(index)
            .and_then(Option::as_deref)
            .map_or(Value::Null, |cell| Value::String(cell.trim().to_string()));
        metadata.insert(label.clone(), value);
    }
    metadata
}

impl ContextualParser for ProductPageParser {
    type Output = ProductRecord;
    type Context = ProductParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let title = html
            .select(&TITLE)
            .next()
            .map(|h1| element_text(&h1))
            .ok_or_else(|| ParsingError::required_field_missing("h1", Some(&context.url)))?;

        let thumbnail = self.extract_thumbnail(html, context);
        if thumbnail.is_none() {
            debug!("No product photo on {}", context.url);
        }

        Ok(ProductRecord {
            model: extract_model(&title),
            tagline: extract_tagline(context),
            category: context.category.clone(),
            metadata: extract_metadata(context),
            thumbnail,
            title,
        })
    }
}

//! Parsing configuration for catalog pages
//!
//! Centralized patterns describing the catalog site's markup.

use serde::{Deserialize, Serialize};

use super::{ParsingError, ParsingResult};
use crate::infrastructure::config::diamond;

/// Row and cell rules applied to category page tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    /// `tr.tabs` rows, row-span cells dropped
    #[default]
    Catalog,
    /// Every row after the first, every cell kept
    Generic,
}

/// Main parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Base URL for resolving catalog-relative links and images
    pub base_url: String,

    /// Regex a table row's first-column href must match to count as a product link
    pub product_link_pattern: String,

    /// Regex selecting the product photo by `src`
    pub thumbnail_pattern: String,

    /// Table layout rules for category pages
    pub table_layout: TableLayout,

    /// Merge adjacent header labels when rows carry fewer cells than the header
    pub reconcile_headers: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            base_url: diamond::BASE_URL.to_string(),
            product_link_pattern: diamond::PRODUCT_LINK_PATTERN.to_string(),
            thumbnail_pattern: diamond::THUMBNAIL_PATTERN.to_string(),
            table_layout: TableLayout::Catalog,
            reconcile_headers: false,
        }
    }
}

impl ParsingConfig {
    /// Reject settings that would make every page parse fail
    pub fn validate(&self) -> ParsingResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ParsingError::configuration("base_url", "base URL must not be empty"));
        }
        if self.product_link_pattern.is_empty() {
            return Err(ParsingError::configuration(
                "product_link_pattern",
                "an empty pattern would treat every first-column link as a product",
            ));
        }
        if self.thumbnail_pattern.is_empty() {
            return Err(ParsingError::configuration("thumbnail_pattern", "thumbnail pattern must not be empty"));
        }
        Ok(())
    }
}

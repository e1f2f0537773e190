//! Parsing context for catalog pages
//!
//! Provides context objects carrying what a page parser needs besides the HTML.

use url::Url;

use crate::domain::TableModel;

/// Context for a category page
#[derive(Debug, Clone)]
pub struct CategoryParseContext {
    /// Page being parsed
    pub url: String,
}

impl CategoryParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Context for a product page reached from a table row
#[derive(Debug, Clone)]
pub struct ProductParseContext {
    /// Product URL being parsed
    pub url: String,

    /// Base URL for resolving relative resources
    pub base_url: Url,

    /// Title of the table that linked to the product
    pub category: String,

    /// Header of the linking table
    pub header: Vec<String>,

    /// The linking row, aligned with `header`
    pub row: Vec<Option<String>>,
}

impl ProductParseContext {
    pub fn new(url: impl Into<String>, base_url: Url) -> Self {
        Self {
            url: url.into(),
            base_url,
            category: String::new(),
            header: Vec::new(),
            row: Vec::new(),
        }
    }

    /// Attach the linking table row
    pub fn with_source(mut self, table: &TableModel, row_index: usize) -> Self {
        self.category.clone_from(&table.title);
        self.header.clone_from(&table.header);
        self.row = table.rows.get(row_index).cloned().unwrap_or_default();
        self
    }

    /// Value of a named column in the linking row
    pub fn column(&self, name: &str) -> Option<&str> {
        let index = self.header.iter().position(|label| label == name)?;
        self.row.get(index)?.as_deref()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header.iter().any(|label| label == name)
    }
}

//! Catalog records emitted by a crawl run
//!
//! Field order is the serialization order of the exported JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog endpoint and the titles of the tables found on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
    pub children: Vec<String>,
}

impl CategoryRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }
}

/// Product image reference: alt text first, absolute URL second
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub alt: String,
    pub url: String,
}

/// A product page joined with the table row that linked to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub model: String,
    pub title: String,
    pub tagline: Option<String>,
    pub category: String,
    /// Column label to cell value, in table column order; absent cells are `null`
    pub metadata: Map<String, Value>,
    pub thumbnail: Option<Thumbnail>,
}

impl ProductRecord {
    /// Metadata value as text, `None` for missing keys and absent cells
    pub fn metadata_value(&self, column: &str) -> Option<&str> {
        self.metadata.get(column).and_then(Value::as_str)
    }
}

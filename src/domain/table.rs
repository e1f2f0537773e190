use serde::{Deserialize, Serialize};

/// Title used when no heading precedes a table
pub const NOT_FOUND_TITLE: &str = "Not Found";

/// Rectangular view of one catalog table
///
/// Built once per `<table>` element during a page visit and never mutated
/// afterwards. When `header` is non-empty every row has exactly
/// `header.len()` cells; `links` always has one slot per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub title: String,
    pub links: Vec<Option<String>>,
}

impl TableModel {
    /// Position of a column by exact header label
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|label| label == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value of a named column in a row, `None` for absent cells or columns
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// Rows paired with the product link found in their first column
    pub fn linked_rows(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(index, link)| link.as_deref().map(|url| (index, url)))
    }

    /// Widest row, used when the header is missing
    pub fn width(&self) -> usize {
        if self.header.is_empty() {
            self.rows.iter().map(Vec::len).max().unwrap_or(0)
        } else {
            self.header.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

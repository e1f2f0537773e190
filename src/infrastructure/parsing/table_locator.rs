//! Table Locator
//!
//! Catalog pages wrap their content in layout tables. Only innermost tables
//! (no `<table>` below them) carry product data.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid table selector"));

/// Every `<table>` that contains no nested `<table>`, in document order
pub fn locate_tables(html: &Html) -> Vec<ElementRef<'_>> {
    html.select(&TABLE).filter(|table| !has_nested_table(table)).collect()
}

fn has_nested_table(table: &ElementRef<'_>) -> bool {
    table
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|element| element.value().name() == "table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_tables_are_skipped() {
        let html = Html::parse_document(
            r#"
            <table id="layout"><tr><td>
                <table id="first"><tr><td>a</td></tr></table>
                <table id="second"><tr><td>b</td></tr></table>
            </td></tr></table>
            "#,
        );

        let ids: Vec<_> = locate_tables(&html)
            .iter()
            .filter_map(|table| table.value().attr("id"))
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_page_without_tables() {
        let html = Html::parse_document("<h1>Accessories</h1><p>Coming soon</p>");
        assert!(locate_tables(&html).is_empty());
    }
}

//! Category page parser
//!
//! A category page is a `<h1>` title followed by product tables inside layout
//! tables. The title is required; a page without one means the site markup
//! changed and is reported as a structural error.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use super::{
    CategoryParseContext, ContextualParser, ParsingConfig, ParsingError, ParsingResult, TableNormalizer,
    element_text, locate_tables,
};
use crate::domain::TableModel;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid h1 selector"));

/// A parsed category page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    pub title: String,
    pub tables: Vec<TableModel>,
}

impl CategoryPage {
    /// Table titles in page order
    pub fn table_titles(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.title.clone()).collect()
    }
}

/// Parser for category pages
#[derive(Debug, Clone)]
pub struct CategoryPageParser {
    normalizer: TableNormalizer,
}

impl CategoryPageParser {
    pub fn new(normalizer: TableNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn from_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self::new(TableNormalizer::from_config(config)?))
    }
}

impl ContextualParser for CategoryPageParser {
    type Output = CategoryPage;
    type Context = CategoryParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let title = html
            .select(&TITLE)
            .next()
            .map(|h1| element_text(&h1))
            .ok_or_else(|| ParsingError::required_field_missing("h1", Some(&context.url)))?;

        let tables: Vec<TableModel> = locate_tables(html)
            .iter()
            .map(|table| self.normalizer.normalize(table))
            .collect();

        debug!("Category '{}' at {} has {} tables", title, context.url, tables.len());
        Ok(CategoryPage { title, tables })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY_PAGE: &str = r#"
        <html><body>
        <h1>  Base Station
              Antennas </h1>
        <table class="layout"><tr><td>
            <h3>Dual Band</h3>
            <table>
                <tr class="tabs"><th>Model</th><th>Gain</th><th>Price</th></tr>
                <tr class="tabs"><td><a href="../x50a.html">X50A</a></td><td>4.5 dBi</td><td>$99</td></tr>
                <tr class="tabs"><td><a href="../x200a.html">X200A</a></td><td>6.0 dBi</td></tr>
            </table>
            <h3>Tri Band</h3>
            <table>
                <tr class="tabs"><th>Model</th><th>Description</th></tr>
                <tr class="tabs"><td><a href="../x5000a.html">X5000A</a></td><td>2m/70cm/23cm</td></tr>
            </table>
        </td></tr></table>
        </body></html>
    "#;

    fn parser() -> CategoryPageParser {
        CategoryPageParser::from_config(&ParsingConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_category_page() {
        let html = Html::parse_document(CATEGORY_PAGE);
        let context = CategoryParseContext::new("https://www.diamondantenna.net/Product_Catalog/base.html");

        let page = parser().parse_with_context(&html, &context).unwrap();

        assert_eq!(page.title, "Base Station Antennas");
        assert_eq!(page.table_titles(), vec!["Dual Band", "Tri Band"]);
        assert_eq!(page.tables[0].rows[1], vec![Some("X200A".to_string()), Some("6.0 dBi".to_string()), None]);
        assert_eq!(page.tables[1].links, vec![Some("https://diamondantenna.net/x5000a.html".to_string())]);
    }

    #[test]
    fn test_missing_title_is_fatal() {
        let html = Html::parse_document("<table><tr class=\"tabs\"><th>Model</th></tr></table>");
        let context = CategoryParseContext::new("https://www.diamondantenna.net/Product_Catalog/empty.html");

        let err = parser().parse_with_context(&html, &context).unwrap_err();
        assert_eq!(
            err,
            ParsingError::required_field_missing("h1", Some("https://www.diamondantenna.net/Product_Catalog/empty.html"))
        );
    }

    #[test]
    fn test_page_without_tables() {
        let html = Html::parse_document("<h1>Discontinued</h1><p>Nothing here</p>");
        let context = CategoryParseContext::new("https://www.diamondantenna.net/Product_Catalog/old.html");

        let page = parser().parse_with_context(&html, &context).unwrap();
        assert_eq!(page.title, "Discontinued");
        assert!(page.tables.is_empty());
    }
}

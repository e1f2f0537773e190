//! Caption Resolver
//!
//! Catalog tables have no `<caption>`; their title is the nearest heading-like
//! element before them in document order.

use scraper::ElementRef;

use super::element_text;
use crate::domain::NOT_FOUND_TITLE;

/// Elements that can title a table
pub const CAPTION_TAGS: &[&str] = &["h2", "h3", "h4", "strong", "b"];

/// Title for a table, or `"Not Found"` when nothing precedes it
pub fn resolve_caption(table: &ElementRef<'_>) -> String {
    find_preceding_caption(table).map_or_else(|| NOT_FOUND_TITLE.to_string(), |caption| element_text(&caption))
}

/// Nearest caption element before `table` in document order
///
/// Walks previous siblings (checking their subtrees last element first), then
/// moves up to the parent and repeats, up to the document root.
pub fn find_preceding_caption<'a>(table: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut node = **table;
    loop {
        let mut sibling = node.prev_sibling();
        while let Some(current) = sibling {
            let caption = current.descendants().filter_map(ElementRef::wrap).filter(is_caption).last();
            if caption.is_some() {
                return caption;
            }
            sibling = current.prev_sibling();
        }

        node = node.parent()?;
        if let Some(ancestor) = ElementRef::wrap(node).filter(is_caption) {
            return Some(ancestor);
        }
    }
}

fn is_caption(element: &ElementRef<'_>) -> bool {
    CAPTION_TAGS.contains(&element.value().name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::locate_tables;
    use scraper::Html;

    fn captions(source: &str) -> Vec<String> {
        let html = Html::parse_document(source);
        locate_tables(&html).iter().map(resolve_caption).collect()
    }

    #[test]
    fn test_nearest_preceding_heading_wins() {
        let titles = captions(
            r#"
            <h2>Base Station Antennas</h2>
            <h3>Dual Band</h3>
            <table><tr><td>X50A</td></tr></table>
            <h3>Tri Band</h3>
            <table><tr><td>X700HNA</td></tr></table>
            "#,
        );
        assert_eq!(titles, vec!["Dual Band", "Tri Band"]);
    }

    #[test]
    fn test_heading_nested_in_previous_sibling() {
        let titles = captions(
            r#"
            <p><font size="4"><strong> Mobile
                Antennas </strong></font></p>
            <div><table><tr><td>NR770HB</td></tr></table></div>
            "#,
        );
        assert_eq!(titles, vec!["Mobile Antennas"]);
    }

    #[test]
    fn test_heading_outside_wrapper_table() {
        let titles = captions(
            r#"
            <h4>VHF/UHF</h4>
            <table><tr><td>
                <p>intro text</p>
                <table><tr><td>SX200</td></tr></table>
            </td></tr></table>
            "#,
        );
        assert_eq!(titles, vec!["VHF/UHF"]);
    }

    #[test]
    fn test_no_heading_yields_sentinel() {
        let titles = captions("<p>No heading here</p><table><tr><td>a</td></tr></table>");
        assert_eq!(titles, vec![NOT_FOUND_TITLE]);
    }

    #[test]
    fn test_headings_after_table_are_ignored() {
        let titles = captions("<table><tr><td>a</td></tr></table><h2>Later</h2>");
        assert_eq!(titles, vec![NOT_FOUND_TITLE]);
    }
}

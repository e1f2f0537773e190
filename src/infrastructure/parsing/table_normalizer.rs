//! Table Normalizer
//!
//! Turns one catalog `<table>` into a rectangular [`TableModel`]. Table
//! variants differ only in which rows count as data and which cells are
//! dropped, so they are expressed as a [`TablePolicy`] of plain predicates
//! rather than a type per table flavour.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::{debug, trace};

use super::{
    LinkExtractor, ParsingConfig, ParsingResult, TableLayout, element_text, header_text, parse_base_url,
    reconcile_header, resolve_caption,
};
use crate::domain::TableModel;
use crate::infrastructure::config::diamond;

static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("valid th selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid tr selector"));
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid td selector"));

/// Which rows and cells of a table carry data
#[derive(Debug, Clone, Copy)]
pub struct TablePolicy {
    /// Row predicate applied to every `<tr>` of the table
    pub is_data_row: fn(&ElementRef<'_>) -> bool,

    /// Cells accepted here are dropped from the row
    pub is_excluded_cell: fn(&ElementRef<'_>) -> bool,

    /// Accepted rows skipped from the front (the header row)
    pub skip_leading_rows: usize,

    /// Merge header labels when rows are narrower than the header
    pub reconcile_header: bool,
}

impl TablePolicy {
    /// Catalog listings: `tr.tabs` rows after the first, row-span cells dropped
    pub fn catalog() -> Self {
        Self {
            is_data_row: has_data_row_class,
            is_excluded_cell: spans_rows,
            skip_leading_rows: 1,
            reconcile_header: false,
        }
    }

    /// Any table: every row after the first, every cell kept
    pub fn generic() -> Self {
        Self {
            is_data_row: |_| true,
            is_excluded_cell: |_| false,
            skip_leading_rows: 1,
            reconcile_header: false,
        }
    }

    pub fn with_header_reconciliation(mut self, enabled: bool) -> Self {
        self.reconcile_header = enabled;
        self
    }
}

impl Default for TablePolicy {
    fn default() -> Self {
        Self::catalog()
    }
}

fn has_data_row_class(row: &ElementRef<'_>) -> bool {
    row.value().classes().any(|class| class == diamond::DATA_ROW_CLASS)
}

// Row-span cells appear once in the markup; the rows they cover are kept
// without them rather than re-filled.
fn spans_rows(cell: &ElementRef<'_>) -> bool {
    cell.value().attr("rowspan").is_some()
}

/// Builds [`TableModel`]s from table elements under one policy
#[derive(Debug, Clone)]
pub struct TableNormalizer {
    policy: TablePolicy,
    links: LinkExtractor,
}

impl TableNormalizer {
    pub fn new(policy: TablePolicy, links: LinkExtractor) -> Self {
        Self { policy, links }
    }

    /// Policy, links and reconciliation taken from the parsing config
    pub fn from_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let links = LinkExtractor::new(parse_base_url(&config.base_url)?, &config.product_link_pattern)?;
        let policy = match config.table_layout {
            TableLayout::Catalog => TablePolicy::catalog(),
            TableLayout::Generic => TablePolicy::generic(),
        }
        .with_header_reconciliation(config.reconcile_headers);
        Ok(Self::new(policy, links))
    }

    /// Normalize one table
    ///
    /// Never fails: missing headers, rows or captions yield empty values.
    pub fn normalize(&self, table: &ElementRef<'_>) -> TableModel {
        let mut header: Vec<String> = table.select(&HEADER_CELL).map(|th| header_text(&th)).collect();

        let data_rows: Vec<ElementRef<'_>> = table
            .select(&ROW)
            .filter(|row| (self.policy.is_data_row)(row))
            .skip(self.policy.skip_leading_rows)
            .collect();

        let raw_rows: Vec<Vec<String>> = data_rows.iter().map(|row| self.row_cells(row)).collect();

        if self.policy.reconcile_header && !header.is_empty() {
            let widths: Vec<usize> = raw_rows.iter().map(Vec::len).collect();
            let reconciled = reconcile_header(&header, &widths);
            if reconciled.len() != header.len() {
                debug!("Reconciled header {:?} into {:?}", header, reconciled);
            }
            header = reconciled;
        }

        let width = header.len();
        let rows = raw_rows
            .into_iter()
            .map(|cells| {
                let mut row: Vec<Option<String>> = cells.into_iter().map(Some).collect();
                if width > 0 {
                    if row.len() > width {
                        trace!("Truncating row of {} cells to {}", row.len(), width);
                    }
                    row.resize(width, None);
                }
                row
            })
            .collect();

        TableModel {
            header,
            rows,
            title: resolve_caption(table),
            links: self.links.extract(&data_rows),
        }
    }

    fn row_cells(&self, row: &ElementRef<'_>) -> Vec<String> {
        row.select(&DATA_CELL)
            .filter(|cell| !(self.policy.is_excluded_cell)(cell))
            .map(|cell| element_text(&cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NOT_FOUND_TITLE;
    use crate::infrastructure::parsing::locate_tables;
    use proptest::prelude::*;
    use scraper::Html;

    fn normalizer(policy: TablePolicy) -> TableNormalizer {
        let links = LinkExtractor::new(
            url::Url::parse(diamond::BASE_URL).unwrap(),
            diamond::PRODUCT_LINK_PATTERN,
        )
        .unwrap();
        TableNormalizer::new(policy, links)
    }

    fn normalize_first(source: &str, policy: TablePolicy) -> TableModel {
        let html = Html::parse_document(source);
        let tables = locate_tables(&html);
        normalizer(policy).normalize(&tables[0])
    }

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|value| value.map(String::from)).collect()
    }

    const DUAL_BAND: &str = r#"
        <h3>Dual Band Base Antennas</h3>
        <table>
            <tr class="tabs"><th>Model</th><th>Gain</th><th>Price</th></tr>
            <tr class="tabs"><td><a href="../x50a.html">X50A</a></td><td>4.5 dBi</td><td>$99</td></tr>
            <tr class="tabs"><td><a href="../x200a.html">X200A</a></td><td>6.0 dBi</td></tr>
            <tr class="tabs"><td><a href="../x300a.html">X300A</a></td><td>6.5 dBi</td><td>$149</td></tr>
            <tr><td colspan="3">Prices subject to change</td></tr>
        </table>
    "#;

    #[test]
    fn test_short_row_is_padded_with_absent_cells() {
        let table = normalize_first(DUAL_BAND, TablePolicy::catalog());

        assert_eq!(table.title, "Dual Band Base Antennas");
        assert_eq!(table.header, vec!["Model", "Gain", "Price"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], cells(&[Some("X50A"), Some("4.5 dBi"), Some("$99")]));
        assert_eq!(table.rows[1], cells(&[Some("X200A"), Some("6.0 dBi"), None]));
        assert_eq!(table.rows[2], cells(&[Some("X300A"), Some("6.5 dBi"), Some("$149")]));
        assert_eq!(
            table.links,
            vec![
                Some("https://diamondantenna.net/x50a.html".to_string()),
                Some("https://diamondantenna.net/x200a.html".to_string()),
                Some("https://diamondantenna.net/x300a.html".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_line_breaks_join_label_parts() {
        let table = normalize_first(
            "<table>\
                <tr class=\"tabs\"><th>Model</th><th>Stacked Element<br>\r\n Phasing/Wavelength</th></tr>\
                <tr class=\"tabs\"><td>X50A</td><td>2 x 5/8 wave</td></tr>\
            </table>",
            TablePolicy::catalog(),
        );

        assert_eq!(table.header, vec!["Model", "Stacked ElementPhasing/Wavelength"]);
    }

    #[test]
    fn test_normalizing_twice_is_identical() {
        let html = Html::parse_document(DUAL_BAND);
        let tables = locate_tables(&html);
        let normalizer = normalizer(TablePolicy::catalog());

        assert_eq!(normalizer.normalize(&tables[0]), normalizer.normalize(&tables[0]));
    }

    #[test]
    fn test_table_without_header_keeps_raw_rows() {
        let table = normalize_first(
            r#"<table>
                <tr><td>ignored first row</td></tr>
                <tr><td>a</td><td>b</td></tr>
                <tr><td>c</td></tr>
            </table>"#,
            TablePolicy::generic(),
        );

        assert!(table.header.is_empty());
        assert_eq!(table.rows, vec![cells(&[Some("a"), Some("b")]), cells(&[Some("c")])]);
        assert_eq!(table.title, NOT_FOUND_TITLE);
        assert_eq!(table.links, vec![None, None]);
    }

    #[test]
    fn test_row_span_cells_are_dropped() {
        let table = normalize_first(
            r#"<table>
                <tr class="tabs"><th>Series</th><th>Model</th><th>Band</th></tr>
                <tr class="tabs"><td rowspan="2">X Series</td><td><a href="../x50a.html">X50A</a></td><td>2m/70cm</td></tr>
                <tr class="tabs"><td><a href="../x510a.html">X510A</a></td><td>2m/70cm</td></tr>
            </table>"#,
            TablePolicy::catalog(),
        );

        assert!(table.rows.iter().flatten().all(|cell| cell.as_deref() != Some("X Series")));
        assert_eq!(table.rows[0], cells(&[Some("X50A"), Some("2m/70cm"), None]));
        // The spanned cell still holds the row's first-column position
        assert_eq!(table.links, vec![None, Some("https://diamondantenna.net/x510a.html".to_string())]);
    }

    #[test]
    fn test_wide_rows_are_truncated_to_header() {
        let table = normalize_first(
            r#"<table>
                <tr class="tabs"><th>Model</th><th>Gain</th></tr>
                <tr class="tabs"><td>X50A</td><td>4.5 dBi</td><td>stray</td></tr>
            </table>"#,
            TablePolicy::catalog(),
        );

        assert_eq!(table.rows, vec![cells(&[Some("X50A"), Some("4.5 dBi")])]);
    }

    #[test]
    fn test_header_reconciliation_merges_split_labels() {
        let source = r#"<table>
                <tr class="tabs"><th>Model</th><th>Element</th><th>Phasing</th></tr>
                <tr class="tabs"><td>X50A</td><td>2 x 5/8 wave</td></tr>
            </table>"#;

        let plain = normalize_first(source, TablePolicy::catalog());
        assert_eq!(plain.header.len(), 3);
        assert_eq!(plain.rows[0], cells(&[Some("X50A"), Some("2 x 5/8 wave"), None]));

        let merged = normalize_first(source, TablePolicy::catalog().with_header_reconciliation(true));
        assert_eq!(merged.header, vec!["Model", "Element Phasing"]);
        assert_eq!(merged.rows[0], cells(&[Some("X50A"), Some("2 x 5/8 wave")]));
    }

    #[test]
    fn test_table_without_data_rows() {
        let table = normalize_first("<p><b>Coming soon</b></p><table><tr><td>layout</td></tr></table>", TablePolicy::catalog());

        assert!(table.header.is_empty());
        assert!(table.rows.is_empty());
        assert!(table.links.is_empty());
        assert_eq!(table.title, "Coming soon");
    }

    #[test]
    fn test_generic_layout_keeps_unmarked_rows() {
        let config = ParsingConfig {
            table_layout: TableLayout::Generic,
            ..ParsingConfig::default()
        };
        let html = Html::parse_document(
            r#"<table>
                <tr><th>Model</th><th>Gain</th></tr>
                <tr><td><a href="../x50a.html">X50A</a></td><td>4.5 dBi</td></tr>
            </table>"#,
        );
        let table = TableNormalizer::from_config(&config).unwrap().normalize(&locate_tables(&html)[0]);

        assert_eq!(table.rows, vec![cells(&[Some("X50A"), Some("4.5 dBi")])]);
        assert_eq!(table.links, vec![Some("https://diamondantenna.net/x50a.html".to_string())]);
    }

    #[test]
    fn test_from_config_rejects_bad_pattern() {
        let config = ParsingConfig {
            product_link_pattern: "(".into(),
            ..ParsingConfig::default()
        };
        assert!(TableNormalizer::from_config(&config).is_err());
    }

    fn table_source(header_len: usize, row_widths: &[usize]) -> String {
        let mut source = String::from("<table><tr class=\"tabs\">");
        for column in 0..header_len {
            source.push_str(&format!("<th>H{column}</th>"));
        }
        source.push_str("</tr>");
        for (row, &width) in row_widths.iter().enumerate() {
            source.push_str("<tr class=\"tabs\">");
            for column in 0..width {
                source.push_str(&format!("<td>r{row}c{column}</td>"));
            }
            source.push_str("</tr>");
        }
        source.push_str("</table>");
        source
    }

    proptest! {
        #[test]
        fn prop_rows_match_header_width(
            header_len in 1usize..6,
            row_widths in prop::collection::vec(0usize..9, 0..8),
        ) {
            let table = normalize_first(&table_source(header_len, &row_widths), TablePolicy::catalog());

            prop_assert_eq!(table.rows.len(), row_widths.len());
            prop_assert_eq!(table.links.len(), table.rows.len());
            for row in &table.rows {
                prop_assert_eq!(row.len(), header_len);
            }
        }
    }
}

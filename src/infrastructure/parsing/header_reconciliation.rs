//! Header Reconciliation
//!
//! Some catalog tables split one logical column across several `<th>` cells
//! (e.g. "Element" / "Phasing" / "Wavelength" over a single data cell). When
//! data rows carry fewer cells than the header, adjacent labels are merged
//! until the widths agree. This is a best-effort heuristic: it never splits a
//! label back apart, and rows wider than the header are left to truncation.

/// Merge adjacent header labels to fit the data rows
///
/// `row_widths` are the data rows' cell counts in document order. The first
/// row narrower than the current header triggers a merge into that many
/// groups; scanning stops once every remaining row fits.
pub fn reconcile_header(header: &[String], row_widths: &[usize]) -> Vec<String> {
    let mut current = header.to_vec();

    for (index, &width) in row_widths.iter().enumerate() {
        if width == 0 || width >= current.len() {
            continue;
        }

        current = merge_labels(&current, width);

        if row_widths[index + 1..].iter().all(|&rest| rest == 0 || rest >= current.len()) {
            break;
        }
    }

    current
}

/// Merge `labels` into `groups` columns; trailing groups absorb the surplus
fn merge_labels(labels: &[String], groups: usize) -> Vec<String> {
    let mut merged = Vec::with_capacity(groups);
    let mut start = 0;

    for group in 0..groups {
        let remaining_labels = labels.len() - start;
        let remaining_groups = groups - group;
        let take = remaining_labels / remaining_groups;

        let label = labels[start..start + take]
            .iter()
            .map(String::as_str)
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        merged.push(label);
        start += take;
    }

    merged
}

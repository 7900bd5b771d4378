//! Ordering and summarizing result rows.

use std::cmp::Ordering;

use crate::models::{CounterRow, ResourceKind};

/// Name of the aggregate row. A resource may carry the same name; the view
/// tells the totals row apart by position, never by name.
pub const TOTALS_LABEL: &str = "Totals";

/// Wait time descending, then name ascending.
pub fn compare(kind: &ResourceKind, a: &CounterRow, b: &CounterRow) -> Ordering {
    kind.row_time(b)
        .cmp(&kind.row_time(a))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sorts rows into display order.
pub fn rank(rows: &mut [CounterRow], kind: &ResourceKind) {
    rows.sort_by(|a, b| compare(kind, a, b));
}

/// Field-wise sum of `rows`, labelled [`TOTALS_LABEL`].
pub fn totals(rows: &[CounterRow], kind: &ResourceKind) -> CounterRow {
    rows.iter()
        .fold(kind.zero_row(TOTALS_LABEL), |mut acc, row| {
            acc.add(row);
            acc
        })
}

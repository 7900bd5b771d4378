//! Per-kind result state and its text rendering.
//!
//! A [`ResourceView`] runs one refresh cycle at a time: fetch, aggregate,
//! reset detection, optional delta against the baseline, ranking, totals.
//! Rendering follows the kind's column groups: cells are right-aligned to
//! their width, separated by a space within a group and by `|` between
//! groups, followed by the name.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::baseline::{BaselineTracker, Observation, compute_delta};
use crate::collector::{CounterSource, SourceError};
use crate::fmt::{format_amount, format_pct, format_time, ratio};
use crate::models::{Column, ColumnValue, CounterRow, ResourceKind, Snapshot};
use crate::normalize::NameNormalizer;
use crate::rank::{rank, totals};

pub struct ResourceView {
    kind: &'static ResourceKind,
    normalizer: Arc<dyn NameNormalizer>,
    tracker: BaselineTracker,
    relative: bool,
    /// Last aggregated snapshot, cumulative.
    current: Vec<CounterRow>,
    /// Ranked rows as displayed.
    results: Vec<CounterRow>,
    totals: CounterRow,
    last_collected: Option<DateTime<Utc>>,
}

impl ResourceView {
    /// New view in relative mode with no data.
    pub fn new(kind: &'static ResourceKind, normalizer: Arc<dyn NameNormalizer>) -> Self {
        Self {
            kind,
            normalizer,
            tracker: BaselineTracker::new(),
            relative: true,
            current: Vec::new(),
            results: Vec::new(),
            totals: totals(&[], kind),
            last_collected: None,
        }
    }

    pub fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    /// Runs one refresh cycle against `source`.
    ///
    /// A source error aborts the cycle; the previous results stay intact.
    pub fn collect(&mut self, source: &mut dyn CounterSource) -> Result<Observation, SourceError> {
        let start = Instant::now();
        let snapshot = source.fetch(self.kind)?;
        let fetched = snapshot.len();
        let observation = self.apply(snapshot);
        debug!(
            "{}: collected {} rows into {} in {:?}",
            self.kind.name,
            fetched,
            self.results.len(),
            start.elapsed()
        );
        Ok(observation)
    }

    /// Runs one refresh cycle for an already-fetched snapshot.
    pub fn apply(&mut self, snapshot: Snapshot) -> Observation {
        let aggregated = aggregate(snapshot, self.kind, self.normalizer.as_ref());
        // Reset detection must settle the baseline before the delta.
        let observation = self.tracker.observe(self.kind, &aggregated);
        self.current = aggregated;
        self.last_collected = Some(Utc::now());
        self.rebuild();
        observation
    }

    /// Makes the current snapshot the zero point for relative results.
    pub fn reset_baseline(&mut self) {
        info!("{}: baseline reset", self.kind.name);
        self.tracker.reset(&self.current);
        self.rebuild();
    }

    pub fn set_relative(&mut self, relative: bool) {
        if self.relative != relative {
            self.relative = relative;
            self.rebuild();
        }
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    fn rebuild(&mut self) {
        let mut rows = match self.tracker.baseline() {
            Some(baseline) if self.relative => compute_delta(&self.current, baseline),
            _ => self.current.clone(),
        };
        rank(&mut rows, self.kind);
        self.totals = totals(&rows, self.kind);
        self.results = rows;
    }

    pub fn description(&self) -> &'static str {
        self.kind.description
    }

    /// Number of result rows, totals excluded.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[CounterRow] {
        &self.results
    }

    pub fn totals(&self) -> &CounterRow {
        &self.totals
    }

    pub fn last_collected(&self) -> Option<DateTime<Utc>> {
        self.last_collected
    }

    pub fn baseline_at(&self) -> Option<DateTime<Utc>> {
        self.tracker.baseline_at()
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn headings(&self) -> String {
        self.render(|col| col.label.to_string(), self.kind.name_label)
    }

    /// The first `max_rows` result rows.
    pub fn row_content(&self, max_rows: usize) -> Vec<String> {
        self.results
            .iter()
            .take(max_rows)
            .map(|row| self.format_row(row, false))
            .collect()
    }

    pub fn total_row_content(&self) -> String {
        self.format_row(&self.totals, true)
    }

    /// A blank line as wide as a data row.
    pub fn empty_row_content(&self) -> String {
        self.render(|_| String::new(), "")
    }

    fn format_row(&self, row: &CounterRow, is_totals: bool) -> String {
        let idle = !is_totals && self.kind.row_count(row) == 0;
        let name = if idle { "" } else { row.name.as_str() };
        self.render(|col| self.cell(col, row), name)
    }

    fn cell(&self, column: &Column, row: &CounterRow) -> String {
        match column.value {
            ColumnValue::Time(i) => format_time(row.value(i)),
            ColumnValue::PctOfTotal(i) => format_pct(ratio(row.value(i), self.totals.value(i))),
            ColumnValue::PctOfRow(part, whole) => format_pct(ratio(row.value(part), row.value(whole))),
            ColumnValue::Amount(i) => format_amount(row.value(i)),
        }
    }

    fn render(&self, cell: impl Fn(&Column) -> String, name: &str) -> String {
        let groups: Vec<String> = self
            .kind
            .columns
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|col| format!("{:>width$}", cell(col), width = col.width))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        format!("{}|{}", groups.join("|"), name)
            .trim_end()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MockSource;
    use crate::models::{TABLE_IO_LATENCY, TABLE_LOCK_LATENCY};
    use crate::normalize::{NameCache, TableNameNormalizer};

    fn table_view() -> ResourceView {
        let normalizer = Arc::new(TableNameNormalizer::new(Arc::new(NameCache::new())));
        ResourceView::new(&TABLE_IO_LATENCY, normalizer)
    }

    fn row(name: &str, count: u64, wait: u64) -> CounterRow {
        let mut r = TABLE_IO_LATENCY.zero_row(name);
        r.values[TABLE_IO_LATENCY.count_field] = count;
        r.values[TABLE_IO_LATENCY.time_field] = wait;
        r
    }

    #[test]
    fn test_relative_results() {
        let mut view = table_view();
        assert!(view.is_relative());
        assert_eq!(
            view.apply(vec![row("db.a", 10, 1000), row("db.b", 5, 500)]),
            Observation::Initialized
        );
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 0);

        assert_eq!(
            view.apply(vec![row("db.a", 12, 1100), row("db.b", 9, 900), row("db.c", 1, 50)]),
            Observation::Continued
        );
        let names: Vec<&str> = view.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["db.b", "db.a", "db.c"]);
        assert_eq!(TABLE_IO_LATENCY.row_time(&view.results()[0]), 400);
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 550);
        assert_eq!(TABLE_IO_LATENCY.row_count(view.totals()), 7);
    }

    #[test]
    fn test_absolute_mode() {
        let mut view = table_view();
        view.apply(vec![row("db.a", 10, 1000)]);
        view.apply(vec![row("db.a", 12, 1100)]);
        view.set_relative(false);
        assert_eq!(TABLE_IO_LATENCY.row_time(&view.results()[0]), 1100);
        view.set_relative(true);
        assert_eq!(TABLE_IO_LATENCY.row_time(&view.results()[0]), 100);
    }

    #[test]
    fn test_restart_gives_zero_delta() {
        let mut view = table_view();
        view.apply(vec![row("db.a", 10, 1000)]);
        assert_eq!(view.apply(vec![row("db.a", 2, 200)]), Observation::Rebaselined);
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 0);
        assert_eq!(view.apply(vec![row("db.a", 3, 260)]), Observation::Continued);
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 60);
    }

    #[test]
    fn test_reset_baseline() {
        let mut view = table_view();
        view.apply(vec![row("db.a", 10, 1000)]);
        view.apply(vec![row("db.a", 15, 1500)]);
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 500);
        view.reset_baseline();
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 0);
        assert!(view.baseline_at().is_some());
    }

    #[test]
    fn test_source_error_keeps_results() {
        let mut source = MockSource::new().with_frames(
            &TABLE_IO_LATENCY,
            vec![vec![row("db.a", 10, 1000)], vec![row("db.a", 11, 1300)]],
        );
        let mut view = table_view();
        view.set_relative(false);
        view.collect(&mut source).unwrap();
        view.collect(&mut source).unwrap();
        let collected = view.last_collected();

        assert!(matches!(
            view.collect(&mut source),
            Err(SourceError::Exhausted { .. })
        ));
        assert_eq!(view.len(), 1);
        assert_eq!(TABLE_IO_LATENCY.row_time(view.totals()), 1300);
        assert_eq!(view.last_collected(), collected);
    }

    #[test]
    fn test_rendering_layout() {
        let mut view = table_view();
        view.set_relative(false);
        view.apply(vec![row("db.a", 3, 3_000_000), row("db.b", 1, 1_000_000)]);

        let headings = view.headings();
        assert!(headings.ends_with("|Table Name"));
        assert_eq!(
            headings.matches('|').count(),
            TABLE_IO_LATENCY.columns.len()
        );

        let rows = view.row_content(10);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with("|db.a"));
        assert!(rows[0].contains("3.00 us"));
        assert!(rows[0].contains(" 75.0%"));
        assert_eq!(view.row_content(1).len(), 1);

        let total = view.total_row_content();
        assert!(total.ends_with("|Totals"));
        assert!(total.contains("100.0%"));

        let empty = view.empty_row_content();
        assert!(empty.chars().all(|c| c == ' ' || c == '|'));
    }

    #[test]
    fn test_idle_delta_row_has_no_name() {
        let mut view = table_view();
        view.apply(vec![row("db.a", 10, 1000), row("db.b", 1, 10)]);
        view.apply(vec![row("db.a", 12, 1100), row("db.b", 1, 10)]);
        let rows = view.row_content(10);
        assert!(rows[0].ends_with("|db.a"));
        assert!(!rows[1].contains("db.b"));
    }

    #[test]
    fn test_idle_row_named_like_totals_is_blank() {
        let mut view = table_view();
        let name = crate::models::table_name("", crate::rank::TOTALS_LABEL);
        view.apply(vec![row("db.a", 10, 1000), row(&name, 1, 10)]);
        view.apply(vec![row("db.a", 12, 1100), row(&name, 1, 10)]);

        assert_eq!(view.results()[1].name, crate::rank::TOTALS_LABEL);
        let rows = view.row_content(10);
        assert!(rows[0].ends_with("|db.a"));
        assert!(!rows[1].contains(crate::rank::TOTALS_LABEL));
        assert!(view.total_row_content().ends_with("|Totals"));
    }

    #[test]
    fn test_empty_view_has_totals() {
        let normalizer = Arc::new(TableNameNormalizer::new(Arc::new(NameCache::new())));
        let mut view = ResourceView::new(&TABLE_LOCK_LATENCY, normalizer);
        view.apply(Vec::new());
        assert_eq!(view.len(), 0);
        assert!(view.total_row_content().ends_with("|Totals"));
        assert_eq!(view.description(), TABLE_LOCK_LATENCY.description);
    }
}

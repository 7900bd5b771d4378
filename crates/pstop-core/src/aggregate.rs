//! Merging rows that share a canonical name.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Instant;

use tracing::debug;

use crate::models::{CounterRow, ResourceKind};
use crate::normalize::NameNormalizer;

/// Normalizes and merges one polled snapshot.
///
/// Rows without activity (`count == 0`) are dropped before normalization.
/// Rows that normalize to the same name are summed field by field. The
/// output order is unspecified; ranking imposes it later.
pub fn aggregate(
    rows: Vec<CounterRow>,
    kind: &ResourceKind,
    normalizer: &dyn NameNormalizer,
) -> Vec<CounterRow> {
    let start = Instant::now();
    let input = rows.len();
    let mut merged: HashMap<String, CounterRow> = HashMap::with_capacity(input);

    for mut row in rows {
        if kind.row_count(&row) == 0 {
            continue;
        }
        let name = normalizer.normalize(&row.name);
        match merged.entry(name) {
            Entry::Occupied(mut e) => e.get_mut().add(&row),
            Entry::Vacant(e) => {
                row.name = e.key().clone();
                e.insert(row);
            }
        }
    }

    let out: Vec<CounterRow> = merged.into_values().collect();
    debug!(
        "{}: aggregated {} rows into {} in {:?}",
        kind.name,
        input,
        out.len(),
        start.elapsed()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FILE_IO_LATENCY, TABLE_LOCK_LATENCY};
    use crate::normalize::{Environment, FileNameNormalizer, NameCache, TableNameNormalizer};
    use std::sync::Arc;

    fn file_row(name: &str, count: u64, wait: u64) -> CounterRow {
        let mut values = vec![0; FILE_IO_LATENCY.fields.len()];
        values[FILE_IO_LATENCY.count_field] = count;
        values[FILE_IO_LATENCY.time_field] = wait;
        CounterRow::new(name, values)
    }

    fn file_normalizer() -> FileNameNormalizer {
        let env = Environment::new(Some("/data/"), None::<String>);
        FileNameNormalizer::new(&env, Arc::new(NameCache::new()))
    }

    fn sorted(mut rows: Vec<CounterRow>) -> Vec<CounterRow> {
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    #[test]
    fn test_partitions_merge_into_one_row() {
        let n = file_normalizer();
        let rows = vec![
            file_row("/data/db1/orders#P#p1.ibd", 5, 100),
            file_row("/data/db1/orders#P#p2.ibd", 7, 50),
        ];
        let out = aggregate(rows, &FILE_IO_LATENCY, &n);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "db1.orders");
        assert_eq!(FILE_IO_LATENCY.row_count(&out[0]), 12);
        assert_eq!(FILE_IO_LATENCY.row_time(&out[0]), 150);
    }

    #[test]
    fn test_idle_rows_dropped_before_normalization() {
        let cache = Arc::new(NameCache::new());
        let env = Environment::new(Some("/data/"), None::<String>);
        let n = FileNameNormalizer::new(&env, Arc::clone(&cache));

        let rows = vec![file_row("/data/db1/idle.ibd", 0, 0), file_row("/data/ibdata1", 1, 9)];
        let out = aggregate(rows, &FILE_IO_LATENCY, &n);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "<ibdata>");
        assert_eq!(cache.get("/data/db1/idle.ibd"), None);
    }

    #[test]
    fn test_order_independent() {
        let n = file_normalizer();
        let rows = vec![
            file_row("/data/db1/a.ibd", 1, 10),
            file_row("/data/ib_logfile0", 2, 20),
            file_row("/data/db1/a#P#p0.ibd", 3, 30),
            file_row("/data/ib_logfile1", 4, 40),
            file_row("/data/other.log", 5, 50),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();
        let mut rotated = rows.clone();
        rotated.rotate_left(2);

        let expected = sorted(aggregate(rows, &FILE_IO_LATENCY, &n));
        assert_eq!(sorted(aggregate(reversed, &FILE_IO_LATENCY, &n)), expected);
        assert_eq!(sorted(aggregate(rotated, &FILE_IO_LATENCY, &n)), expected);
        assert_eq!(expected.len(), 3);
    }

    #[test]
    fn test_table_rows() {
        let n = TableNameNormalizer::new(Arc::new(NameCache::new()));
        let mut a = TABLE_LOCK_LATENCY.zero_row("db1.#sql-1_1");
        a.values[0] = 1;
        a.values[1] = 10;
        let mut b = TABLE_LOCK_LATENCY.zero_row("db2.#sql-2_2");
        b.values[0] = 2;
        b.values[1] = 5;

        let out = aggregate(vec![a, b], &TABLE_LOCK_LATENCY, &n);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "<temp_table>");
        assert_eq!(out[0].values[0], 3);
        assert_eq!(out[0].values[1], 15);
    }
}

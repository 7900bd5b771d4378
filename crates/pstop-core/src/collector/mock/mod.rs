//! In-memory counter source for demos and tests.
//!
//! Each kind is scripted either as a fixed list of frames or as a growing
//! series (`base + step * poll`) that can simulate a server restart by
//! starting over every N polls.

mod scenarios;

pub use scenarios::{SCENARIO_DATADIR, SCENARIO_RELAY_LOG};

use std::collections::{HashMap, HashSet};

use crate::collector::{CounterSource, SourceError};
use crate::models::{CounterRow, ResourceKind, Snapshot};

#[derive(Debug, Clone)]
enum Series {
    Frames(Vec<Snapshot>),
    Growing {
        base: Vec<CounterRow>,
        step: Vec<CounterRow>,
        restart_every: Option<usize>,
    },
}

/// Scripted counter source.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    series: HashMap<&'static str, Series>,
    polls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
}

impl MockSource {
    /// Creates a source with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `frames` in order, then [`SourceError::Exhausted`].
    pub fn with_frames(mut self, kind: &ResourceKind, frames: Vec<Snapshot>) -> Self {
        self.series.insert(kind.name, Series::Frames(frames));
        self
    }

    /// Serves `base + step * n` on the n-th poll. Rows of `step` are matched
    /// to `base` by name. With `restart_every`, `n` wraps back to zero.
    pub fn with_growth(
        mut self,
        kind: &ResourceKind,
        base: Vec<CounterRow>,
        step: Vec<CounterRow>,
        restart_every: Option<usize>,
    ) -> Self {
        self.series.insert(
            kind.name,
            Series::Growing {
                base,
                step,
                restart_every: restart_every.filter(|n| *n > 0),
            },
        );
        self
    }

    /// Makes the next fetch for `kind` fail once.
    pub fn fail_next(&mut self, kind: &ResourceKind) {
        self.failing.insert(kind.name);
    }

    /// Number of successful fetches served for `kind`.
    pub fn polls(&self, kind: &ResourceKind) -> usize {
        self.polls.get(kind.name).copied().unwrap_or(0)
    }
}

impl CounterSource for MockSource {
    fn fetch(&mut self, kind: &ResourceKind) -> Result<Snapshot, SourceError> {
        if self.failing.remove(kind.name) {
            return Err(SourceError::Unavailable {
                kind: kind.name,
                reason: "simulated failure".to_string(),
            });
        }

        let series = self
            .series
            .get(kind.name)
            .ok_or_else(|| SourceError::UnknownKind(kind.name.to_string()))?;
        let poll = self.polls.get(kind.name).copied().unwrap_or(0);

        let snapshot = match series {
            Series::Frames(frames) => frames
                .get(poll)
                .cloned()
                .ok_or(SourceError::Exhausted { kind: kind.name })?,
            Series::Growing {
                base,
                step,
                restart_every,
            } => {
                let n = match restart_every {
                    Some(every) => poll % every,
                    None => poll,
                } as u64;
                base.iter()
                    .map(|row| {
                        let mut grown = row.clone();
                        if let Some(inc) = step.iter().find(|s| s.name == row.name) {
                            for (v, d) in grown.values.iter_mut().zip(&inc.values) {
                                *v = v.saturating_add(d.saturating_mul(n));
                            }
                        }
                        grown
                    })
                    .collect()
            }
        };

        *self.polls.entry(kind.name).or_insert(0) += 1;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FILE_IO_LATENCY, TABLE_LOCK_LATENCY};

    fn row(name: &str, count: u64, wait: u64) -> CounterRow {
        let mut r = TABLE_LOCK_LATENCY.zero_row(name);
        r.values[TABLE_LOCK_LATENCY.count_field] = count;
        r.values[TABLE_LOCK_LATENCY.time_field] = wait;
        r
    }

    #[test]
    fn test_frames_then_exhausted() {
        let mut source = MockSource::new()
            .with_frames(&TABLE_LOCK_LATENCY, vec![vec![row("db.a", 1, 1)], vec![]]);

        assert_eq!(source.fetch(&TABLE_LOCK_LATENCY).unwrap().len(), 1);
        assert!(source.fetch(&TABLE_LOCK_LATENCY).unwrap().is_empty());
        assert!(matches!(
            source.fetch(&TABLE_LOCK_LATENCY),
            Err(SourceError::Exhausted { kind: "table_lock_latency" })
        ));
        assert_eq!(source.polls(&TABLE_LOCK_LATENCY), 2);
    }

    #[test]
    fn test_growth_with_restart() {
        let mut source = MockSource::new().with_growth(
            &TABLE_LOCK_LATENCY,
            vec![row("db.a", 10, 100)],
            vec![row("db.a", 1, 5)],
            Some(3),
        );

        let waits: Vec<u64> = (0..5)
            .map(|_| TABLE_LOCK_LATENCY.row_time(&source.fetch(&TABLE_LOCK_LATENCY).unwrap()[0]))
            .collect();
        assert_eq!(waits, vec![100, 105, 110, 100, 105]);
    }

    #[test]
    fn test_unscripted_kind_and_failure() {
        let mut source = MockSource::new().with_frames(&TABLE_LOCK_LATENCY, vec![vec![]]);
        assert!(matches!(
            source.fetch(&FILE_IO_LATENCY),
            Err(SourceError::UnknownKind(_))
        ));

        source.fail_next(&TABLE_LOCK_LATENCY);
        assert!(matches!(
            source.fetch(&TABLE_LOCK_LATENCY),
            Err(SourceError::Unavailable { .. })
        ));
        assert!(source.fetch(&TABLE_LOCK_LATENCY).is_ok());
    }
}

//! Baseline tracking and relative ("since reset") deltas.
//!
//! The tracker keeps one aggregated snapshot as the zero point. Cumulative
//! counters only grow, so a snapshot whose total wait time is below the
//! baseline's means the server's counters restarted; the baseline is then
//! replaced before any delta is computed, keeping deltas non-negative.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::{CounterRow, ResourceKind};
use crate::rank::totals;

/// What [`BaselineTracker::observe`] did with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First snapshot; it became the baseline.
    Initialized,
    /// Baseline kept.
    Continued,
    /// Counter reset detected; the snapshot replaced the baseline.
    Rebaselined,
}

/// Owns the baseline snapshot of one resource kind.
#[derive(Debug, Default)]
pub struct BaselineTracker {
    baseline: Option<Vec<CounterRow>>,
    baseline_at: Option<DateTime<Utc>>,
}

impl BaselineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next aggregated snapshot through the state machine.
    pub fn observe(&mut self, kind: &ResourceKind, current: &[CounterRow]) -> Observation {
        let reset_detected = self
            .baseline
            .as_deref()
            .map(|baseline| needs_rebaseline(kind, baseline, current));

        match reset_detected {
            None => {
                self.replace(current);
                Observation::Initialized
            }
            Some(true) => {
                info!(
                    "{}: counters went backwards, taking a new baseline",
                    kind.name
                );
                self.replace(current);
                Observation::Rebaselined
            }
            Some(false) => Observation::Continued,
        }
    }

    /// Makes `current` the new zero point.
    pub fn reset(&mut self, current: &[CounterRow]) {
        self.replace(current);
    }

    pub fn baseline(&self) -> Option<&[CounterRow]> {
        self.baseline.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.baseline.is_some()
    }

    /// When the current baseline was taken.
    pub fn baseline_at(&self) -> Option<DateTime<Utc>> {
        self.baseline_at
    }

    fn replace(&mut self, current: &[CounterRow]) {
        self.baseline = Some(current.to_vec());
        self.baseline_at = Some(Utc::now());
    }
}

/// True if `baseline` has more total wait time than `current`.
pub fn needs_rebaseline(kind: &ResourceKind, baseline: &[CounterRow], current: &[CounterRow]) -> bool {
    kind.row_time(&totals(baseline, kind)) > kind.row_time(&totals(current, kind))
}

/// Subtracts baseline rows from current rows, matching by name.
///
/// Rows missing from the baseline are returned unchanged; rows only in the
/// baseline are dropped.
pub fn compute_delta(current: &[CounterRow], baseline: &[CounterRow]) -> Vec<CounterRow> {
    let by_name: HashMap<&str, &CounterRow> =
        baseline.iter().map(|r| (r.name.as_str(), r)).collect();

    current
        .iter()
        .map(|row| {
            let mut delta = row.clone();
            if let Some(initial) = by_name.get(row.name.as_str()) {
                delta.subtract(initial);
            }
            delta
        })
        .collect()
}

//! Counter source replaying recorded snapshots from a JSON document.
//!
//! ```json
//! {
//!   "file_io_latency": [
//!     [ { "name": "/var/lib/mysql/ibdata1", "values": { "count_star": 10, "...": 0 } } ],
//!     [ { "name": "/var/lib/mysql/ibdata1", "values": { "count_star": 12, "...": 0 } } ]
//!   ]
//! }
//! ```
//!
//! Each top-level key is a resource kind; its value is the list of
//! snapshots served by successive fetches.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::collector::{CounterSource, SourceError};
use crate::models::{ResourceKind, Snapshot};

#[derive(Debug, Clone, Deserialize)]
struct RecordedRow {
    name: String,
    values: BTreeMap<String, u64>,
}

/// Replays recorded snapshots, one per fetch, per kind.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    recordings: HashMap<String, Vec<Vec<RecordedRow>>>,
    positions: HashMap<String, usize>,
}

impl ReplaySource {
    /// Loads a recording from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let source = Self::from_json(&content)?;
        debug!(
            "loaded replay {} with {} kinds",
            path.as_ref().display(),
            source.recordings.len()
        );
        Ok(source)
    }

    /// Parses a recording. Unknown kinds are rejected; rows are validated
    /// against their descriptor only when fetched.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let recordings: HashMap<String, Vec<Vec<RecordedRow>>> = serde_json::from_str(json)?;
        if let Some(unknown) = recordings
            .keys()
            .find(|k| ResourceKind::by_name(k).is_none())
        {
            return Err(SourceError::UnknownKind(unknown.clone()));
        }
        Ok(Self {
            recordings,
            positions: HashMap::new(),
        })
    }

    /// Number of recorded snapshots for `kind`.
    pub fn len(&self, kind: &ResourceKind) -> usize {
        self.recordings.get(kind.name).map_or(0, Vec::len)
    }
}

impl CounterSource for ReplaySource {
    fn fetch(&mut self, kind: &ResourceKind) -> Result<Snapshot, SourceError> {
        let frames = self
            .recordings
            .get(kind.name)
            .ok_or_else(|| SourceError::UnknownKind(kind.name.to_string()))?;
        let position = self.positions.entry(kind.name.to_string()).or_insert(0);
        let frame = frames
            .get(*position)
            .ok_or(SourceError::Exhausted { kind: kind.name })?;
        *position += 1;

        let rows = frame
            .iter()
            .map(|row| kind.row_from_named(row.name.as_str(), &row.values))
            .collect::<Result<Snapshot, _>>()?;
        Ok(rows)
    }
}

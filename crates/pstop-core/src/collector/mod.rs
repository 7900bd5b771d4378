//! Raw counter sources.
//!
//! A [`CounterSource`] returns one snapshot of cumulative counter rows for a
//! resource kind. The engine never retries a failed fetch: the refresh cycle
//! is abandoned and the previous results stay on screen.
//!
//! ```text
//!   CounterSource::fetch ──► aggregate ──► BaselineTracker ──► rank/totals
//!        │
//!        ├── MockSource    (scripted scenarios, demos and tests)
//!        └── ReplaySource  (recorded snapshots from a JSON file)
//! ```

pub mod mock;
mod replay;

pub use mock::MockSource;
pub use replay::ReplaySource;

use thiserror::Error;

use crate::models::{ModelError, ResourceKind, Snapshot};

/// Errors that abort a refresh cycle.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A row did not match the kind's field schema.
    #[error("malformed row: {0}")]
    Malformed(#[from] ModelError),
    /// The source cannot serve this kind right now.
    #[error("{kind}: source unavailable: {reason}")]
    Unavailable { kind: &'static str, reason: String },
    /// The source has no data at all for this kind.
    #[error("{0}: not provided by this source")]
    UnknownKind(String),
    /// A replay source ran out of recorded snapshots.
    #[error("{kind}: no more snapshots")]
    Exhausted { kind: &'static str },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplier of raw cumulative counter snapshots.
pub trait CounterSource {
    /// Returns the current cumulative state of every resource of `kind`.
    fn fetch(&mut self, kind: &ResourceKind) -> Result<Snapshot, SourceError>;
}

impl<S: CounterSource + ?Sized> CounterSource for Box<S> {
    fn fetch(&mut self, kind: &ResourceKind) -> Result<Snapshot, SourceError> {
        (**self).fetch(kind)
    }
}

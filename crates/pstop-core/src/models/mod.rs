//! Counter rows and resource-kind descriptors.
//!
//! A [`ResourceKind`] is the declarative schema of one performance_schema
//! summary table: its accumulator fields, which of them hold the overall
//! operation count and wait time, and the columns shown for it. The engine
//! (aggregate, baseline, rank, view) is generic over this descriptor.

mod kinds;

pub use kinds::{ALL_KINDS, FILE_IO_LATENCY, TABLE_IO_LATENCY, TABLE_LOCK_LATENCY};

use std::collections::BTreeMap;

use thiserror::Error;

/// One poll's worth of rows, in source order.
pub type Snapshot = Vec<CounterRow>;

/// What an accumulator measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Number of events.
    Count,
    /// Cumulative wait time in picoseconds.
    Time,
    /// Cumulative byte total.
    Bytes,
}

/// Name and kind of one accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn count(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Count,
        }
    }

    pub const fn time(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Time,
        }
    }

    pub const fn bytes(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Bytes,
        }
    }
}

/// How a display column derives its value from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue {
    /// Field formatted as latency.
    Time(usize),
    /// Field as a share of the same field in the totals row.
    PctOfTotal(usize),
    /// First field as a share of the second field of the same row.
    PctOfRow(usize, usize),
    /// Field formatted as a count or byte amount.
    Amount(usize),
}

/// One fixed-width display column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub width: usize,
    pub value: ColumnValue,
}

impl Column {
    pub const fn new(label: &'static str, width: usize, value: ColumnValue) -> Self {
        Self {
            label,
            width,
            value,
        }
    }
}

/// Which normalizer rule set applies to a kind's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRules {
    /// Raw identifiers are file paths.
    File,
    /// Raw identifiers are `schema.table`.
    Table,
}

/// Declarative description of one monitored resource kind.
#[derive(Debug)]
pub struct ResourceKind {
    /// Short name, also used on the command line and in replay files.
    pub name: &'static str,
    /// Human-readable description shown above the table.
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
    /// Index of the field holding the total operation count.
    pub count_field: usize,
    /// Index of the field holding the total wait time (the ranking metric).
    pub time_field: usize,
    /// Column groups; groups are separated by `|` when rendered.
    pub columns: &'static [&'static [Column]],
    /// Heading of the trailing name column.
    pub name_label: &'static str,
    pub name_rules: NameRules,
}

impl PartialEq for ResourceKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceKind {}

impl ResourceKind {
    /// Looks up a built-in kind by its short name.
    pub fn by_name(name: &str) -> Option<&'static ResourceKind> {
        ALL_KINDS.iter().copied().find(|k| k.name == name)
    }

    /// Index of the field called `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Total operation count of a row.
    pub fn row_count(&self, row: &CounterRow) -> u64 {
        row.value(self.count_field)
    }

    /// Total wait time of a row.
    pub fn row_time(&self, row: &CounterRow) -> u64 {
        row.value(self.time_field)
    }

    /// A row with every accumulator at zero.
    pub fn zero_row(&self, name: impl Into<String>) -> CounterRow {
        CounterRow::new(name, vec![0; self.fields.len()])
    }

    /// Builds a row from positional values, checking the arity.
    pub fn row_from_values(
        &self,
        identifier: impl Into<String>,
        values: Vec<u64>,
    ) -> Result<CounterRow, ModelError> {
        let identifier = identifier.into();
        if values.len() != self.fields.len() {
            return Err(ModelError::WrongArity {
                kind: self.name,
                identifier,
                expected: self.fields.len(),
                got: values.len(),
            });
        }
        Ok(CounterRow::new(identifier, values))
    }

    /// Builds a row from a `metric -> value` mapping.
    ///
    /// Every field of the kind must be present and no other metric may appear.
    pub fn row_from_named(
        &self,
        identifier: impl Into<String>,
        named: &BTreeMap<String, u64>,
    ) -> Result<CounterRow, ModelError> {
        let identifier = identifier.into();

        if let Some(unknown) = named.keys().find(|k| self.field_index(k).is_none()) {
            return Err(ModelError::UnknownMetric {
                kind: self.name,
                identifier,
                metric: unknown.clone(),
            });
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            match named.get(field.name) {
                Some(v) => values.push(*v),
                None => {
                    return Err(ModelError::MissingMetric {
                        kind: self.name,
                        identifier,
                        metric: field.name,
                    });
                }
            }
        }
        Ok(CounterRow::new(identifier, values))
    }
}

/// Validation errors for rows built from source data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{kind}: row `{identifier}` has no value for `{metric}`")]
    MissingMetric {
        kind: &'static str,
        identifier: String,
        metric: &'static str,
    },
    #[error("{kind}: row `{identifier}` has unknown metric `{metric}`")]
    UnknownMetric {
        kind: &'static str,
        identifier: String,
        metric: String,
    },
    #[error("{kind}: row `{identifier}` has {got} values, expected {expected}")]
    WrongArity {
        kind: &'static str,
        identifier: String,
        expected: usize,
        got: usize,
    },
}

/// Cumulative counters of one resource at one point in time.
///
/// `values` is indexed by the owning [`ResourceKind`]'s `fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterRow {
    pub name: String,
    pub values: Vec<u64>,
}

impl CounterRow {
    pub fn new(name: impl Into<String>, values: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Value of field `index`, zero if the row is shorter.
    pub fn value(&self, index: usize) -> u64 {
        self.values.get(index).copied().unwrap_or(0)
    }

    /// Field-wise addition.
    pub fn add(&mut self, other: &CounterRow) {
        if self.values.len() < other.values.len() {
            self.values.resize(other.values.len(), 0);
        }
        for (v, o) in self.values.iter_mut().zip(&other.values) {
            *v = v.saturating_add(*o);
        }
    }

    /// Field-wise subtraction, clamped at zero.
    pub fn subtract(&mut self, other: &CounterRow) {
        for (v, o) in self.values.iter_mut().zip(&other.values) {
            *v = v.saturating_sub(*o);
        }
    }
}

/// Joins schema and table into `schema.table`, dropping the dot when either
/// part is empty.
pub fn table_name(schema: &str, table: &str) -> String {
    match (schema.is_empty(), table.is_empty()) {
        (false, false) => format!("{}.{}", schema, table),
        (false, true) => schema.to_string(),
        (true, _) => table.to_string(),
    }
}

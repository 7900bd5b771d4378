//! Canonical names for `schema.table` identifiers.

use std::sync::Arc;

use super::{MungeRules, NameCache, NameNormalizer, RE_TEMP_TABLE, TEMP_TABLE};

/// Rule set for identifiers that already name a table.
///
/// Server-internal temporary tables collapse to `<temp_table>`; other
/// names pass through the configured munge rules.
pub struct TableNameNormalizer {
    munge: MungeRules,
    cache: Arc<NameCache>,
}

impl TableNameNormalizer {
    pub fn new(cache: Arc<NameCache>) -> Self {
        Self {
            munge: MungeRules::default(),
            cache,
        }
    }

    pub fn with_munge(mut self, munge: MungeRules) -> Self {
        self.munge = munge;
        self
    }

    fn resolve(&self, raw: &str) -> String {
        let table = raw.split_once('.').map_or(raw, |(_, table)| table);
        if RE_TEMP_TABLE.is_match(table) {
            return TEMP_TABLE.to_string();
        }
        if self.munge.is_empty() {
            raw.to_string()
        } else {
            self.munge.apply(raw)
        }
    }
}

impl NameNormalizer for TableNameNormalizer {
    fn normalize(&self, raw: &str) -> String {
        self.cache.get_or_insert_with(raw, || self.resolve(raw))
    }
}

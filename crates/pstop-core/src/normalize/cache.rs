//! Process-wide raw-identifier to canonical-name cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Memoizes normalization results for the lifetime of the process.
///
/// Shared (via `Arc`) by every normalizer and safe to use from
/// independently scheduled refresh cycles. Entries are never evicted: the
/// set of raw identifiers is bounded by the schema.
#[derive(Debug, Default)]
pub struct NameCache {
    names: RwLock<HashMap<String, String>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical name previously stored for `raw`.
    pub fn get(&self, raw: &str) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(raw)
            .cloned()
    }

    /// Stores `canonical` for `raw` and returns it.
    pub fn insert(&self, raw: impl Into<String>, canonical: impl Into<String>) -> String {
        let canonical = canonical.into();
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(raw.into(), canonical.clone());
        canonical
    }

    /// Returns the cached name for `raw`, computing and storing it on a miss.
    ///
    /// The miss path re-checks and evaluates `resolve` under the write lock,
    /// so concurrent callers never run the rule cascade twice for one key.
    pub fn get_or_insert_with<F>(&self, raw: &str, resolve: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(hit) = self.get(raw) {
            return hit;
        }

        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        names
            .entry(raw.to_string())
            .or_insert_with(resolve)
            .clone()
    }

    /// Number of cached identifiers.
    pub fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_get_or_insert_with() {
        let cache = NameCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_insert_with("/data/db/t.ibd", || "db.t".to_string());
        let second = cache.get_or_insert_with("/data/db/t.ibd", || "other".to_string());

        assert_eq!(first, "db.t");
        assert_eq!(second, "db.t");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/data/db/t.ibd").as_deref(), Some("db.t"));
    }

    #[test]
    fn test_insert_returns_canonical() {
        let cache = NameCache::new();
        assert_eq!(cache.insert("raw", "canon"), "canon");
        assert_eq!(cache.get("raw").as_deref(), Some("canon"));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_concurrent_resolution_runs_once() {
        let cache = Arc::new(NameCache::new());
        let evaluations = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let evaluations = Arc::clone(&evaluations);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let name = cache.get_or_insert_with("/data/ibdata1", || {
                            evaluations.fetch_add(1, Ordering::SeqCst);
                            "<ibdata>".to_string()
                        });
                        assert_eq!(name, "<ibdata>");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(evaluations.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}

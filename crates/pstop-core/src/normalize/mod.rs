//! Collapsing volatile resource identifiers into canonical names.
//!
//! Every resource kind has a rule set ([`FileNameNormalizer`] for file paths,
//! [`TableNameNormalizer`] for `schema.table` identifiers). Both memoize
//! through a shared [`NameCache`] keyed by the exact raw identifier.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pstop_core::normalize::{Environment, FileNameNormalizer, NameCache, NameNormalizer};
//!
//! let env = Environment::new(Some("/data/"), None::<String>);
//! let normalizer = FileNameNormalizer::new(&env, Arc::new(NameCache::new()));
//! assert_eq!(normalizer.normalize("/data/db1/orders#P#p3.ibd"), "db1.orders");
//! assert_eq!(normalizer.normalize("/data/ibdata1"), "<ibdata>");
//! ```

mod cache;
mod file;
mod munge;
mod table;

pub use cache::NameCache;
pub use file::FileNameNormalizer;
pub use munge::{MungeRule, MungeRules};
pub use table::TableNameNormalizer;

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::{NameRules, ResourceKind};

/// Sentinel for server-internal temporary tables.
pub const TEMP_TABLE: &str = "<temp_table>";

/// Placeholder replacing the data-directory prefix.
pub const DATADIR_PLACEHOLDER: &str = "<datadir>/";

/// Temporary table names: `#sql-1a2b_3`, `#sql-ib1234-567`, `#sql2-...`.
pub(crate) static RE_TEMP_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#sql\d?-[0-9A-Za-z_-]+").expect("valid temp table regex"));

static RE_ONE_OR_THE_OTHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\.)?/").expect("valid slash regex"));
static RE_SLASH_DOT_DOT_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^/]+/\.\./").expect("valid dot-dot regex"));

/// Maps a raw identifier to its canonical name. Never fails.
pub trait NameNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;
}

/// Deployment facts the file rules depend on.
///
/// Supplied once at startup; assumed constant for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Server data directory (`@@datadir`).
    pub datadir: Option<String>,
    /// Relay log base name (`@@relay_log`), absolute or relative to `datadir`.
    pub relay_log: Option<String>,
}

impl Environment {
    pub fn new(datadir: Option<impl Into<String>>, relay_log: Option<impl Into<String>>) -> Self {
        Self {
            datadir: datadir.map(Into::into).filter(|s| !s.is_empty()),
            relay_log: relay_log.map(Into::into).filter(|s| !s.is_empty()),
        }
    }

    /// Data directory, always ending in `/`.
    pub fn datadir(&self) -> Option<String> {
        self.datadir.as_ref().map(|d| {
            if d.ends_with('/') {
                d.clone()
            } else {
                format!("{}/", d)
            }
        })
    }

    /// Relay log base path with relative paths resolved against the data
    /// directory and redundant segments removed.
    pub fn relay_log_path(&self) -> Option<String> {
        let relay_log = self.relay_log.as_deref()?;
        let path = match (relay_log.starts_with('/'), self.datadir()) {
            (false, Some(datadir)) => format!("{}{}", datadir, relay_log),
            _ => relay_log.to_string(),
        };
        Some(cleanup_path(&path))
    }
}

/// Removes redundant path segments until nothing changes.
///
/// `//` and `/./` become `/`, and `segment/../` becomes `/`. Every rewrite
/// shortens the string, so the loop terminates.
pub fn cleanup_path(path: &str) -> String {
    let mut path = path.to_string();
    loop {
        let collapsed = RE_ONE_OR_THE_OTHER.replace_all(&path, "/").into_owned();
        let collapsed = RE_SLASH_DOT_DOT_SLASH
            .replace_all(&collapsed, "/")
            .into_owned();
        if collapsed == path {
            return path;
        }
        path = collapsed;
    }
}

/// Decodes the server's filename encoding of special characters in schema
/// and table names: `@` followed by four hex digits names a code point
/// (`@002d` is `-`, `@0024` is `$`).
pub fn decode_filename(name: &str) -> Cow<'_, str> {
    if !name.contains('@') {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find('@') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let decoded = tail
            .get(..4)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[4..];
            }
            None => {
                out.push('@');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Builds the normalizer for a resource kind's rule set.
pub fn for_kind(
    kind: &ResourceKind,
    env: &Environment,
    cache: Arc<NameCache>,
    munge: MungeRules,
) -> Arc<dyn NameNormalizer> {
    match kind.name_rules {
        NameRules::File => Arc::new(FileNameNormalizer::new(env, cache).with_munge(munge)),
        NameRules::Table => Arc::new(TableNameNormalizer::new(cache).with_munge(munge)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_path_reaches_fixed_point() {
        let cleaned = cleanup_path("a/b/../c//d/./e");
        assert_eq!(cleaned, "a/c/d/e");
        assert_eq!(cleanup_path(&cleaned), cleaned);
    }

    #[test]
    fn test_cleanup_path_leaves_clean_paths() {
        assert_eq!(cleanup_path("/var/lib/mysql/db/t.ibd"), "/var/lib/mysql/db/t.ibd");
        assert_eq!(cleanup_path(""), "");
        assert_eq!(cleanup_path("/a//b///c"), "/a/b/c");
    }

    #[test]
    fn test_relay_log_path() {
        let env = Environment::new(Some("/data/mysql"), Some("../relay/relay-bin"));
        assert_eq!(env.relay_log_path().as_deref(), Some("/data/relay/relay-bin"));

        let env = Environment::new(Some("/data/mysql/"), Some("/logs//relay-bin"));
        assert_eq!(env.relay_log_path().as_deref(), Some("/logs/relay-bin"));

        let env = Environment::new(None::<String>, Some("relay-bin"));
        assert_eq!(env.relay_log_path().as_deref(), Some("relay-bin"));

        let env = Environment::new(Some("/data/"), Some(""));
        assert_eq!(env.relay_log_path(), None);
    }

    #[test]
    fn test_datadir_trailing_slash() {
        let env = Environment::new(Some("/data"), None::<String>);
        assert_eq!(env.datadir().as_deref(), Some("/data/"));
        assert_eq!(Environment::default().datadir(), None);
    }

    #[test]
    fn test_decode_filename() {
        assert_eq!(decode_filename("plain"), "plain");
        assert_eq!(decode_filename("my@002dtable"), "my-table");
        assert_eq!(decode_filename("cost@0024"), "cost$");
        assert_eq!(decode_filename("odd@zz"), "odd@zz");
        assert_eq!(decode_filename("end@"), "end@");
    }
}

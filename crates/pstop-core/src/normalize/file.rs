//! Canonical names for `file_summary_by_instance` file paths.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::warn;

use super::{
    DATADIR_PLACEHOLDER, Environment, MungeRules, NameCache, NameNormalizer, RE_TEMP_TABLE,
    cleanup_path, decode_filename,
};

static RE_TABLE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([^/]+)/([^/]+)\.(frm|ibd|MYD|MYI|CSM|CSV|par)$").expect("valid table file regex")
});
static RE_PART_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+)#[Pp]#[Pp](\d+|MAX)").expect("valid partition regex"));

/// Special server files, checked in this order after table files.
static SPECIAL_FILES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"/ibtmp\d+$", "<ibtmp>"),
        (r"/ibdata\d+$", "<ibdata>"),
        (r"/ib_logfile\d+$", "<redo_log>"),
        (r"/binlog\.(\d{6}|index)$", "<binlog>"),
        (r"/db\.opt$", "<db_opt>"),
        (r"/slowlog$", "<slow_log>"),
        (r"/auto\.cnf$", "<auto_cnf>"),
    ]
    .into_iter()
    .map(|(re, name)| (Regex::new(re).expect("valid special file regex"), name))
    .collect()
});

/// Checked after the relay log, which depends on the environment.
static TRAILING_SPECIAL_FILES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"/[^/]+\.pid$", "<pid_file>"),
        (r"/share/[^/]+/errmsg\.sys$", "<errmsg>"),
        (r"/share/charsets/Index\.xml$", "<charset>"),
    ]
    .into_iter()
    .map(|(re, name)| (Regex::new(re).expect("valid special file regex"), name))
    .collect()
});

pub const RELAY_LOG: &str = "<relay_log>";

/// File-path rule set.
///
/// Table data files collapse to `schema.table` (all partitions of a table
/// merge into one row), temporary tables to `<temp_table>`, well-known server
/// files to a `<category>` sentinel, and everything else to a cleaned path
/// with the data directory replaced by `<datadir>/`.
pub struct FileNameNormalizer {
    datadir: Option<String>,
    relay_log: Option<Regex>,
    munge: MungeRules,
    cache: Arc<NameCache>,
}

impl FileNameNormalizer {
    pub fn new(env: &Environment, cache: Arc<NameCache>) -> Self {
        let relay_log = env.relay_log_path().and_then(|path| {
            let pattern = format!(r"{}\.(\d{{6}}|index)$", regex::escape(&path));
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("relay log pattern for {} rejected: {}", path, e);
                    None
                }
            }
        });

        Self {
            datadir: env.datadir(),
            relay_log,
            munge: MungeRules::default(),
            cache,
        }
    }

    /// Applies `munge` to table names after un-mangling.
    pub fn with_munge(mut self, munge: MungeRules) -> Self {
        self.munge = munge;
        self
    }

    /// Runs the rule cascade without consulting the cache.
    fn resolve(&self, raw: &str) -> String {
        let path = cleanup_path(&raw.replace("@0024", "$"));

        if let Some(caps) = RE_TABLE_FILE.captures(&path) {
            let schema = &caps[1];
            let base = &caps[2];

            if RE_TEMP_TABLE.is_match(base) {
                return super::TEMP_TABLE.to_string();
            }
            let table = RE_PART_TABLE
                .captures(base)
                .and_then(|part| part.get(1))
                .map_or(base, |m| m.as_str());
            let name = format!("{}.{}", decode_filename(schema), decode_filename(table));
            return self.munge.apply(&name);
        }

        if let Some((_, name)) = SPECIAL_FILES.iter().find(|(re, _)| re.is_match(&path)) {
            return name.to_string();
        }
        if let Some(re) = &self.relay_log
            && re.is_match(&path)
        {
            return RELAY_LOG.to_string();
        }
        if let Some((_, name)) = TRAILING_SPECIAL_FILES
            .iter()
            .find(|(re, _)| re.is_match(&path))
        {
            return name.to_string();
        }

        match &self.datadir {
            Some(datadir) if path.starts_with(datadir.as_str()) => {
                format!("{}{}", DATADIR_PLACEHOLDER, &path[datadir.len()..])
            }
            _ => path,
        }
    }
}

impl NameNormalizer for FileNameNormalizer {
    fn normalize(&self, raw: &str) -> String {
        self.cache.get_or_insert_with(raw, || self.resolve(raw))
    }
}

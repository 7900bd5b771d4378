//! TOML configuration: deployment facts and name rewrites.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::normalize::{Environment, MungeRule, MungeRules};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("munge rule {index}: bad pattern {pattern:?}: {source}")]
    BadPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server data directory (`@@datadir`).
    #[serde(default)]
    pub datadir: Option<String>,
    /// Relay log base name (`@@relay_log`).
    #[serde(default)]
    pub relay_log: Option<String>,
    #[serde(default)]
    pub munge: Vec<MungeEntry>,
}

/// One `[[munge]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MungeEntry {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string.
    pub fn load_from_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.munge_rules()?;
        Ok(config)
    }

    pub fn environment(&self) -> Environment {
        Environment::new(self.datadir.clone(), self.relay_log.clone())
    }

    /// Compiles the `[[munge]]` entries in file order.
    pub fn munge_rules(&self) -> Result<MungeRules, ConfigError> {
        let rules = self
            .munge
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                MungeRule::new(&entry.pattern, entry.replacement.as_str()).map_err(|source| {
                    ConfigError::BadPattern {
                        index,
                        pattern: entry.pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MungeRules::new(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
datadir = "/var/lib/mysql"
relay_log = "relay-bin"

[[munge]]
pattern = '^shard_[0-9]+\.'
replacement = "shard_N."

[[munge]]
pattern = '_\d{8}$'
replacement = "_YYYYMMDD"
"#;

    #[test]
    fn test_load_from_str() {
        let config = Config::load_from_str(SAMPLE).unwrap();
        assert_eq!(config.datadir.as_deref(), Some("/var/lib/mysql"));
        assert_eq!(config.munge.len(), 2);

        let env = config.environment();
        assert_eq!(env.datadir().as_deref(), Some("/var/lib/mysql/"));
        assert_eq!(
            env.relay_log_path().as_deref(),
            Some("/var/lib/mysql/relay-bin")
        );

        let rules = config.munge_rules().unwrap();
        assert_eq!(rules.apply("shard_4.events_20240101"), "shard_N.events_YYYYMMDD");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::load_from_str("").unwrap();
        assert_eq!(config.environment(), Environment::default());
        assert!(config.munge_rules().unwrap().is_empty());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let err = Config::load_from_str("[[munge]]\npattern = \"(unclosed\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::BadPattern { index: 0, .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::load_from_str("datadri = \"/x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.relay_log.as_deref(), Some("relay-bin"));

        let err = Config::load("/nonexistent/pstop.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

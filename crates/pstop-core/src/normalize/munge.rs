//! User-configured rewrites of canonical `schema.table` names.

use regex::Regex;

/// One `pattern -> replacement` rewrite. The replacement may reference
/// capture groups (`$1`, `${name}`).
#[derive(Debug, Clone)]
pub struct MungeRule {
    pattern: Regex,
    replacement: String,
}

impl MungeRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }
}

/// Ordered list of rewrites, applied one after another.
#[derive(Debug, Clone, Default)]
pub struct MungeRules {
    rules: Vec<MungeRule>,
}

impl MungeRules {
    pub fn new(rules: Vec<MungeRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn apply(&self, name: &str) -> String {
        self.rules.iter().fold(name.to_string(), |acc, rule| {
            rule.pattern
                .replace_all(&acc, rule.replacement.as_str())
                .into_owned()
        })
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-defined shortcuts for the first word of a command line.
///
/// Entries are kept sorted by alias name, which gives `listalias` a stable
/// order within and across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// Insert or overwrite an alias.
    pub fn set(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.entries.insert(alias.into(), target.into());
    }

    /// Remove an alias, returning its target, or `None` if it wasn't set.
    pub fn remove(&mut self, alias: &str) -> Option<String> {
        self.entries.remove(alias)
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite `line` if its first word is an alias.
    ///
    /// Only the first word is replaced and the result is not expanded again.
    pub fn expand(&self, line: &str) -> Option<String> {
        let line = line.trim_start();
        let first = line.split_whitespace().next()?;
        let target = self.get(first)?;
        Some(format!("{}{}", target, &line[first.len()..]))
    }
}

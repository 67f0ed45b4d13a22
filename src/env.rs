use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env as stdenv;
use std::sync::LazyLock;

/// Fallback for `USER` when the process environment doesn't define it.
pub const DEFAULT_USER: &str = "default_user";

static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]+)\}").expect("constant pattern"));

/// Session-level variables available for `${NAME}` substitution.
///
/// The table is seeded once from the process environment (`HOME`, `USER`,
/// `PWD`) and afterwards only changes through `setenv`/`cd`. It is persisted
/// with the rest of the session, so it serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentTable {
    vars: BTreeMap<String, String>,
}

impl EnvironmentTable {
    /// Capture `HOME`, `USER` and `PWD` from the current process.
    pub fn seeded() -> Self {
        let mut table = Self::default();
        // $HOME first, then the passwd entry.
        let home = dirs::home_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.set("HOME", home);
        table.set(
            "USER",
            stdenv::var("USER")
                .ok()
                .filter(|user| !user.is_empty())
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
        );
        let pwd = stdenv::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.set("PWD", pwd);
        table
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Insert or overwrite a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace every `${NAME}` whose name is known with its value.
    ///
    /// Unknown names are left as written. Substituted text is never scanned
    /// again, so a value containing `${...}` comes through literally.
    pub fn substitute(&self, line: &str) -> String {
        VAR_PATTERN
            .replace_all(line, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

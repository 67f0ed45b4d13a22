use crate::alias::AliasTable;
use crate::env::EnvironmentTable;
use serde::{Deserialize, Serialize};
use std::env as stdenv;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_USERNAME: &str = "user";
pub const DEFAULT_HOST_LABEL: &str = "environment";

/// ANSI escape that ends a colored prompt.
pub const RESET_CODE: &str = "\x1b[0m";

/// Color of the prompt text.
///
/// Stored as its lowercase name; any unknown name reads back as [`PromptColor::Reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromptColor {
    #[default]
    Reset,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl PromptColor {
    pub const ALL: [PromptColor; 8] = [
        PromptColor::Reset,
        PromptColor::Red,
        PromptColor::Green,
        PromptColor::Yellow,
        PromptColor::Blue,
        PromptColor::Magenta,
        PromptColor::Cyan,
        PromptColor::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PromptColor::Reset => "reset",
            PromptColor::Red => "red",
            PromptColor::Green => "green",
            PromptColor::Yellow => "yellow",
            PromptColor::Blue => "blue",
            PromptColor::Magenta => "magenta",
            PromptColor::Cyan => "cyan",
            PromptColor::White => "white",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            PromptColor::Reset => RESET_CODE,
            PromptColor::Red => "\x1b[31m",
            PromptColor::Green => "\x1b[32m",
            PromptColor::Yellow => "\x1b[33m",
            PromptColor::Blue => "\x1b[34m",
            PromptColor::Magenta => "\x1b[35m",
            PromptColor::Cyan => "\x1b[36m",
            PromptColor::White => "\x1b[37m",
        }
    }
}

impl FromStr for PromptColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        PromptColor::ALL
            .into_iter()
            .find(|color| color.name() == lower)
            .ok_or_else(|| s.to_string())
    }
}

impl From<String> for PromptColor {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<PromptColor> for String {
    fn from(color: PromptColor) -> Self {
        color.name().to_string()
    }
}

impl fmt::Display for PromptColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a session remembers, threaded through every builtin.
///
/// Field names on disk follow the long-standing `config.json` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub username: String,
    #[serde(rename = "computer")]
    pub host_label: String,
    #[serde(rename = "current_directory")]
    pub working_directory: PathBuf,
    pub prompt_color: PromptColor,
    #[serde(rename = "command_history")]
    pub history: Vec<String>,
    #[serde(rename = "command_aliases")]
    pub aliases: AliasTable,
    #[serde(rename = "env_vars")]
    pub environment: EnvironmentTable,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            host_label: DEFAULT_HOST_LABEL.to_string(),
            working_directory: start_directory(),
            prompt_color: PromptColor::Reset,
            history: Vec::new(),
            aliases: AliasTable::default(),
            environment: EnvironmentTable::seeded(),
        }
    }
}

impl SessionState {
    /// Prompt shown before each line of input.
    pub fn prompt(&self) -> String {
        format!(
            "{}{}@{}:{}$ {}",
            self.prompt_color.code(),
            self.username,
            self.host_label,
            self.working_directory.display(),
            RESET_CODE
        )
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.working_directory.join(path)
    }
}

/// Directory the process was started in.
pub fn start_directory() -> PathBuf {
    stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

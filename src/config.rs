//! Persisting [`SessionState`] between runs.

use crate::state::{SessionState, start_directory};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Session file, relative to the start directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("Failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to write config file {path}: {source}")]
    WriteFile { path: PathBuf, source: io::Error },
}

/// How [`ConfigStore::load`] obtained the state it returned.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded(PathBuf),
    Missing,
    Invalid(ConfigError),
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Loaded(path) => {
                write!(f, "Configuration loaded from '{}'.", path.display())
            }
            LoadStatus::Missing => {
                write!(f, "No existing configuration file found, using default settings.")
            }
            LoadStatus::Invalid(err) => {
                write!(f, "Error loading configuration: {err}\nUsing default settings.")
            }
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session, falling back to defaults.
    ///
    /// Never fails: a missing or unreadable file yields
    /// [`SessionState::default`] together with a status describing why.
    pub fn load(&self) -> (SessionState, LoadStatus) {
        match self.try_load() {
            Ok(Some(mut state)) => {
                if !state.working_directory.is_dir() {
                    warn!(
                        dir = %state.working_directory.display(),
                        "saved working directory is gone, using start directory"
                    );
                    state.working_directory = start_directory();
                }
                info!(path = %self.path.display(), "configuration loaded");
                (state, LoadStatus::Loaded(self.path.clone()))
            }
            Ok(None) => (SessionState::default(), LoadStatus::Missing),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "configuration ignored");
                (SessionState::default(), LoadStatus::Invalid(err))
            }
        }
    }

    fn try_load(&self) -> Result<Option<SessionState>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Overwrite the file with the full state as indented JSON.
    pub fn save(&self, state: &SessionState) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json + "\n").map_err(|source| ConfigError::WriteFile {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

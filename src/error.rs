//! Error types for builtin commands.
//!
//! Every failure a builtin can hit is rendered as a one-line diagnostic by the
//! session loop; none of them end the session.

use std::io;
use thiserror::Error;

/// Result type alias for builtin execution.
pub type ShellResult<T> = Result<T, ShellError>;

/// Coarse classification of a [`ShellError`], stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    NotFound,
    Permission,
    Conflict,
    Validation,
    Timeout,
    Collaborator,
    Unrecognized,
}

/// Failure of a single command line.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Wrong argument count or shape
    #[error("Usage: {0}")]
    Usage(String),

    /// PID, file, alias or directory absent
    #[error("{0}")]
    NotFound(String),

    /// Insufficient rights
    #[error("{0}")]
    Permission(String),

    /// Something already exists where it was about to be created
    #[error("{0}")]
    Conflict(String),

    /// Argument has the right shape but an unacceptable value
    #[error("{0}")]
    Validation(String),

    /// Network probe ran out of time
    #[error("{0}")]
    Timeout(String),

    /// Unclassified failure reported by the OS or a spawned program
    #[error("An error occurred: {0}")]
    Collaborator(String),

    /// First token names no builtin
    #[error("Command '{0}' not recognized. Type 'help' for a list of commands.")]
    Unrecognized(String),

    /// Writing command output failed
    #[error("An error occurred: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellError::Usage(_) => ErrorKind::Usage,
            ShellError::NotFound(_) => ErrorKind::NotFound,
            ShellError::Permission(_) => ErrorKind::Permission,
            ShellError::Conflict(_) => ErrorKind::Conflict,
            ShellError::Validation(_) => ErrorKind::Validation,
            ShellError::Timeout(_) => ErrorKind::Timeout,
            ShellError::Collaborator(_) | ShellError::Io(_) => ErrorKind::Collaborator,
            ShellError::Unrecognized(_) => ErrorKind::Unrecognized,
        }
    }

    /// Classify a filesystem error, using the caller's wording for the two
    /// cases users most often hit.
    pub(crate) fn from_io(
        err: io::Error,
        not_found: impl Into<String>,
        denied: impl Into<String>,
    ) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ShellError::NotFound(not_found.into()),
            io::ErrorKind::PermissionDenied => ShellError::Permission(denied.into()),
            io::ErrorKind::AlreadyExists => ShellError::Conflict(err.to_string()),
            io::ErrorKind::TimedOut => ShellError::Timeout(err.to_string()),
            _ => ShellError::Collaborator(err.to_string()),
        }
    }
}

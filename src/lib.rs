//! An interactive command environment with a fixed set of built-in commands.
//!
//! Every input line goes through `${NAME}` substitution, a history append,
//! one level of alias expansion and then the builtin table: file and
//! directory operations, process listing and termination, a TCP reachability
//! check, and commands that customize the prompt. The whole session (prompt
//! identity, working directory, history, aliases and variables) is kept in a
//! JSON file between runs.
//!
//! The main entry point is [`Interpreter`]. [`ConfigStore`] loads and saves the
//! [`SessionState`] it works on.

mod builtin;
pub mod alias;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod lexer;
mod local_fs;
pub mod state;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

pub use alias::AliasTable;
pub use command::Flow;
pub use config::{ConfigError, ConfigStore, LoadStatus};
pub use env::EnvironmentTable;
pub use error::{ErrorKind, ShellError, ShellResult};
pub use state::{PromptColor, SessionState};

//! The fixed catalog of commands.
//!
//! Each builtin is a typed argument struct plus an `execute` body. The order of
//! [`builtin_table`] is the dispatch order: the first factory whose match rule
//! accepts a line gets it.

mod alias;
mod fs;
mod net;
mod process;
mod session;

use crate::command::{Arity, CommandFactory, ExecutableCommand, Flow, MatchRule};
use crate::error::{ShellError, ShellResult};
use crate::interpreter::Factory;
use crate::lexer::CommandLine;
use crate::state::SessionState;
use argh::{EarlyExit, FromArgs};
use std::io::Write;

pub(crate) use alias::{ListAlias, SetAlias, Unalias};
pub(crate) use fs::{Cat, Cd, Cp, Ls, Mkdir, Pwd, Rm, Touch};
pub(crate) use net::Ping;
pub(crate) use process::{Kill, Ps};
pub(crate) use session::{
    About, Blank, ChangeHost, ChangeUser, Clear, Exit, Help, History, SetEnv, SetPromptColor,
    banner,
};

/// Built-in commands known to the shell at compile time.
///
/// The associated constants are the command's row in the dispatch table;
/// [`Factory`] turns them into a [`CommandFactory`].
pub(crate) trait Builtin: Sized {
    /// Verb as typed by the user, e.g. `"ls"`.
    const VERB: &'static str;
    const MATCH: MatchRule;
    /// Positional arguments accepted after the verb.
    const ARITY: Arity;
    /// Printed after `Usage: ` when the arguments don't fit.
    const USAGE: &'static str;

    /// Build the command from a line already known to match.
    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs>;

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow>;
}

impl<T: Builtin> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut SessionState,
    ) -> ShellResult<Flow> {
        <T as Builtin>::execute(*self, stdout, session)
    }
}

/// Stand-in for a command whose arguments didn't parse.
pub(crate) enum InvalidArgs {
    /// `--help` was requested; the text is printed and nothing else happens.
    Help(String),
    Error(ShellError),
}

impl From<ShellError> for InvalidArgs {
    fn from(err: ShellError) -> Self {
        InvalidArgs::Error(err)
    }
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _session: &mut SessionState,
    ) -> ShellResult<Flow> {
        match *self {
            InvalidArgs::Help(output) => {
                write!(stdout, "{output}")?;
                Ok(Flow::Continue)
            }
            InvalidArgs::Error(err) => Err(err),
        }
    }
}

impl<T: Builtin + 'static> CommandFactory for Factory<T> {
    fn verb(&self) -> &'static str {
        T::VERB
    }

    fn try_create(&self, line: &CommandLine) -> Option<Box<dyn ExecutableCommand>> {
        if !T::MATCH.matches(T::VERB, line) {
            return None;
        }
        if !T::ARITY.accepts(line.args().len()) {
            return Some(Box::new(InvalidArgs::Error(usage::<T>())));
        }
        let cmd: Box<dyn ExecutableCommand> = match T::parse(line) {
            Ok(cmd) => Box::new(cmd),
            Err(invalid) => Box::new(invalid),
        };
        Some(cmd)
    }
}

pub(crate) fn usage<T: Builtin>() -> ShellError {
    ShellError::Usage(T::USAGE.to_string())
}

/// Parse the line's arguments with `argh`, reporting failures as a usage error.
pub(crate) fn parse_args<T: Builtin + FromArgs>(line: &CommandLine) -> Result<T, InvalidArgs> {
    let args: Vec<&str> = line.args().iter().map(String::as_str).collect();
    T::from_args(&[T::VERB], &args).map_err(|EarlyExit { output, status }| match status {
        Ok(()) => InvalidArgs::Help(output),
        Err(()) => InvalidArgs::Error(usage::<T>()),
    })
}

/// Every builtin, in dispatch order.
pub(crate) fn builtin_table() -> Vec<Box<dyn CommandFactory>> {
    vec![
        // Whole-line verbs
        Box::new(Factory::<Blank>::default()),
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Ps>::default()),
        Box::new(Factory::<Clear>::default()),
        Box::new(Factory::<ListAlias>::default()),
        Box::new(Factory::<Pwd>::default()),
        Box::new(Factory::<Help>::default()),
        Box::new(Factory::<About>::default()),
        Box::new(Factory::<History>::default()),
        // First-token verbs
        Box::new(Factory::<SetAlias>::default()),
        Box::new(Factory::<Unalias>::default()),
        Box::new(Factory::<SetEnv>::default()),
        Box::new(Factory::<SetPromptColor>::default()),
        Box::new(Factory::<ChangeUser>::default()),
        Box::new(Factory::<ChangeHost>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Cat>::default()),
        Box::new(Factory::<Touch>::default()),
        // Prefix verbs
        Box::new(Factory::<Kill>::default()),
        Box::new(Factory::<Ls>::default()),
        Box::new(Factory::<Mkdir>::default()),
        Box::new(Factory::<Ping>::default()),
        Box::new(Factory::<Rm>::default()),
        Box::new(Factory::<Cp>::default()),
    ]
}

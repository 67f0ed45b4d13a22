use crate::error::ShellResult;
use crate::lexer::CommandLine;
use crate::state::SessionState;
use std::io::Write;

/// What the session loop does once a command has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the next prompt.
    Continue,
    /// Clear the terminal and reprint the banner before the next prompt.
    ClearScreen,
    /// Ask for confirmation, then save and leave.
    ConfirmExit,
}

/// How a builtin's verb is recognized in a resolved line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The whole line equals the verb; any extra text means no match.
    Whole,
    /// The first token equals the verb.
    Token,
    /// The line starts with the verb, even when more text is glued to it
    /// (`lsfoo` runs `ls`).
    Prefix,
}

impl MatchRule {
    pub fn matches(self, verb: &str, line: &CommandLine) -> bool {
        match self {
            MatchRule::Whole => line.raw() == verb,
            MatchRule::Token => line.verb() == verb,
            MatchRule::Prefix => line.raw().starts_with(verb),
        }
    }
}

/// Number of positional arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::AtMost(n) => count <= n,
            Arity::Any => true,
        }
    }
}

/// Object-safe trait for a parsed command ready to run.
///
/// Implemented by builtins via a blanket impl and by the placeholder that
/// reports bad arguments.
pub trait ExecutableCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, session: &mut SessionState)
    -> ShellResult<Flow>;
}

/// One row of the dispatch table.
///
/// Returns `None` when the line isn't meant for this command. A line that is
/// meant for it but has bad arguments still yields a command, one that
/// reports the problem when executed.
pub trait CommandFactory {
    /// Verb this factory answers to, for diagnostics and tests.
    fn verb(&self) -> &'static str;

    fn try_create(&self, line: &CommandLine) -> Option<Box<dyn ExecutableCommand>>;
}

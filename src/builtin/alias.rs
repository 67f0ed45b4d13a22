use super::{Builtin, InvalidArgs, parse_args};
use crate::command::{Arity, Flow, MatchRule};
use crate::error::{ShellError, ShellResult};
use crate::lexer::CommandLine;
use crate::state::SessionState;
use argh::FromArgs;
use std::io::Write;

#[derive(FromArgs)]
/// Create a shortcut: typing the alias as the first word runs the command instead.
pub struct SetAlias {
    #[argh(positional)]
    /// shortcut name
    pub alias: String,

    #[argh(positional)]
    /// command word the shortcut stands for
    pub command: String,
}

impl Builtin for SetAlias {
    const VERB: &'static str = "setalias";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::Exactly(2);
    const USAGE: &'static str = "setalias <alias> <command>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "Alias '{}' set to '{}'.", self.alias, self.command)?;
        session.aliases.set(self.alias, self.command);
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Remove a shortcut.
pub struct Unalias {
    #[argh(positional)]
    /// shortcut name
    pub alias: String,
}

impl Builtin for Unalias {
    const VERB: &'static str = "unalias";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::Exactly(1);
    const USAGE: &'static str = "unalias <alias>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        match session.aliases.remove(&self.alias) {
            Some(_) => {
                writeln!(stdout, "Alias '{}' removed.", self.alias)?;
                Ok(Flow::Continue)
            }
            None => Err(ShellError::NotFound(format!(
                "Alias '{}' not found.",
                self.alias
            ))),
        }
    }
}

pub struct ListAlias;

impl Builtin for ListAlias {
    const VERB: &'static str = "listalias";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "listalias";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(ListAlias)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        if session.aliases.is_empty() {
            writeln!(stdout, "No aliases set.")?;
        } else {
            writeln!(stdout, "Current aliases:")?;
            for (alias, command) in session.aliases.list() {
                writeln!(stdout, "{alias} -> {command}")?;
            }
        }
        Ok(Flow::Continue)
    }
}

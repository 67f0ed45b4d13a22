use super::{Builtin, InvalidArgs, parse_args};
use crate::command::{Arity, Flow, MatchRule};
use crate::error::{ShellError, ShellResult};
use crate::lexer::CommandLine;
use crate::state::{PromptColor, SessionState};
use argh::FromArgs;
use std::io::Write;

/// Name shown in the banner and `about`.
pub const PRODUCT_NAME: &str = "Buntu Environment";

pub fn banner() -> String {
    format!(
        "\n{PRODUCT_NAME} v{}\n\nType 'help' For A List Of Commands\n",
        env!("CARGO_PKG_VERSION")
    )
}

const HELP_TEXT: &str = "
Available Commands:
------------------

General Operations:
    help      - Show this help message
    about     - About the Buntu Environment
    exit      - Exit the Buntu Environment (saves the session)
    clear     - Clear the screen
    history   - Show command history

Directory / File Operations:
    pwd                  - Show current directory
    ls [-a] [-l]         - List files in current directory
    cd [dir]             - Change the current directory ($HOME when omitted)
    mkdir <name>         - Create a new directory
    rm <file>            - Remove a file
    rm -r <dir>          - Remove a directory and everything in it
    cp <source> <dest>   - Copy files and directories
    cat <file>...        - Show the contents of files
    touch <file>...      - Create an empty file or update its timestamp

Customization Operations:
    promptcolor <color>        - Change the color of the prompt
    setenv <name> <value>      - Set an environment variable, used as ${name}
    setalias <alias> <command> - Create a shortcut for a command (e.g., 'setalias ll ls')
    unalias <alias>            - Remove a shortcut (e.g., 'unalias ll')
    listalias                  - List the shortcuts currently set

Internet Operations:
    ping <host>   - Check whether a host accepts connections on port 80

Root Operations:
    crn <name>    - Change the user name shown in the prompt
    ccn <name>    - Change the computer name shown in the prompt

Process Operations:
    ps            - List all active processes (PID, name, status, CPU and memory usage)
    kill <PID>    - Forcefully terminate a process by its Process ID
";

/// An empty line.
pub struct Blank;

impl Builtin for Blank {
    const VERB: &'static str = "";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(Blank)
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout)?;
        Ok(Flow::Continue)
    }
}

/// Leave the shell after confirmation.
pub struct Exit;

impl Builtin for Exit {
    const VERB: &'static str = "exit";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "exit";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(Exit)
    }

    fn execute(self, _stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        Ok(Flow::ConfirmExit)
    }
}

pub struct Clear;

impl Builtin for Clear {
    const VERB: &'static str = "clear";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "clear";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(Clear)
    }

    fn execute(self, _stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        Ok(Flow::ClearScreen)
    }
}

pub struct Help;

impl Builtin for Help {
    const VERB: &'static str = "help";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "help";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(Help)
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "{HELP_TEXT}")?;
        Ok(Flow::Continue)
    }
}

pub struct About;

impl Builtin for About {
    const VERB: &'static str = "about";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "about";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(About)
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "{}", banner())?;
        writeln!(
            stdout,
            "A small interactive shell with a fixed set of builtins.\n\
             Session state is saved on exit and restored on the next start."
        )?;
        Ok(Flow::Continue)
    }
}

pub struct History;

impl Builtin for History {
    const VERB: &'static str = "history";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "history";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(History)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        for (index, line) in session.history.iter().enumerate() {
            writeln!(stdout, "{:>5}  {}", index + 1, line)?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Set a session variable, usable as ${NAME} in later commands.
pub struct SetEnv {
    #[argh(positional)]
    /// variable name
    pub name: String,

    #[argh(positional)]
    /// new value
    pub value: String,
}

impl Builtin for SetEnv {
    const VERB: &'static str = "setenv";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::Exactly(2);
    const USAGE: &'static str = "setenv <name> <value>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "{} set to {}", self.name, self.value)?;
        session.environment.set(self.name, self.value);
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Change the color of the prompt.
pub struct SetPromptColor {
    #[argh(positional)]
    /// one of reset, red, green, yellow, blue, magenta, cyan, white
    pub color: String,
}

impl Builtin for SetPromptColor {
    const VERB: &'static str = "promptcolor";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::Exactly(1);
    const USAGE: &'static str = "promptcolor <color>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        let color: PromptColor = self.color.parse().map_err(|unknown| {
            let names: Vec<&str> = PromptColor::ALL.iter().map(|c| c.name()).collect();
            ShellError::Validation(format!(
                "Unknown color '{unknown}'. Available colors: {}",
                names.join(", ")
            ))
        })?;
        session.prompt_color = color;
        writeln!(stdout, "Prompt color set to {color}.")?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Change the user name shown in the prompt.
pub struct ChangeUser {
    #[argh(positional)]
    /// new user name
    pub name: String,
}

impl Builtin for ChangeUser {
    const VERB: &'static str = "crn";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::Exactly(1);
    const USAGE: &'static str = "crn <name>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "Username changed to '{}'.", self.name)?;
        session.username = self.name;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Change the computer name shown in the prompt.
pub struct ChangeHost {
    #[argh(positional)]
    /// new computer name
    pub name: String,
}

impl Builtin for ChangeHost {
    const VERB: &'static str = "ccn";
    const MATCH: MatchRule = MatchRule::Token;
    const ARITY: Arity = Arity::Exactly(1);
    const USAGE: &'static str = "ccn <name>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "Computer name changed to '{}'.", self.name)?;
        session.host_label = self.name;
        Ok(Flow::Continue)
    }
}

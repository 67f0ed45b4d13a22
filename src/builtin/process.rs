use super::{Builtin, InvalidArgs, usage};
use crate::command::{Arity, Flow, MatchRule};
use crate::error::{ShellError, ShellResult};
use crate::external;
use crate::lexer::CommandLine;
use crate::state::SessionState;
use nix::errno::Errno;
use std::io::Write;
use tracing::warn;

/// List running processes.
pub struct Ps;

impl Builtin for Ps {
    const VERB: &'static str = "ps";
    const MATCH: MatchRule = MatchRule::Whole;
    const ARITY: Arity = Arity::Exactly(0);
    const USAGE: &'static str = "ps";

    fn parse(_line: &CommandLine) -> Result<Self, InvalidArgs> {
        Ok(Ps)
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        let table = external::list_processes().map_err(|err| {
            warn!(error = %err, "listing processes failed");
            ShellError::Collaborator(err.to_string())
        })?;
        writeln!(
            stdout,
            "{:<8} {:<25} {:<15} {:<10} {:<10}",
            "PID", "Name", "Status", "CPU%", "Memory%"
        )?;
        writeln!(stdout, "{}", "-".repeat(75))?;
        writeln!(stdout, "{table}")?;
        Ok(Flow::Continue)
    }
}

/// Forcefully terminate a process.
pub struct Kill {
    /// Raw token; anything but a positive number is rejected at execution.
    pub pid: String,
}

impl Builtin for Kill {
    const VERB: &'static str = "kill";
    const MATCH: MatchRule = MatchRule::Prefix;
    const ARITY: Arity = Arity::Exactly(1);
    const USAGE: &'static str = "kill <PID>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        match line.args() {
            [pid] => Ok(Kill { pid: pid.clone() }),
            _ => Err(usage::<Self>().into()),
        }
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        let pid = self
            .pid
            .parse::<i32>()
            .ok()
            .filter(|pid| *pid > 0)
            .ok_or_else(|| {
                ShellError::Validation("Invalid PID. Please enter a numeric value.".to_string())
            })?;

        match external::terminate(pid) {
            Ok(()) => {
                writeln!(stdout, "Process {pid} terminated successfully.")?;
                Ok(Flow::Continue)
            }
            Err(Errno::ESRCH) => Err(ShellError::NotFound(format!(
                "Error: Process with PID {pid} not found."
            ))),
            Err(Errno::EPERM) => Err(ShellError::Permission(format!(
                "Error: Insufficient permissions to terminate process {pid}."
            ))),
            Err(errno) => {
                warn!(pid, %errno, "kill failed");
                Err(ShellError::Collaborator(errno.desc().to_string()))
            }
        }
    }
}

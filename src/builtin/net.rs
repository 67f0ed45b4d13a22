use super::{Builtin, InvalidArgs, parse_args};
use crate::command::{Arity, Flow, MatchRule};
use crate::error::{ShellError, ShellResult};
use crate::external::{self, ProbeError};
use crate::lexer::CommandLine;
use crate::state::SessionState;
use argh::FromArgs;
use std::io::Write;
use std::time::Duration;
use tracing::warn;

pub const PING_PORT: u16 = 80;
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(FromArgs)]
/// Check whether a host accepts TCP connections on port 80.
pub struct Ping {
    #[argh(positional)]
    /// hostname or IP address
    pub host: String,
}

impl Builtin for Ping {
    const VERB: &'static str = "ping";
    const MATCH: MatchRule = MatchRule::Prefix;
    const ARITY: Arity = Arity::Exactly(1);
    const USAGE: &'static str = "ping <hostname or IP address>";

    fn parse(line: &CommandLine) -> Result<Self, InvalidArgs> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut SessionState) -> ShellResult<Flow> {
        writeln!(stdout, "\nPinging {}...\n", self.host)?;
        stdout.flush()?;

        match external::probe(&self.host, PING_PORT, PING_TIMEOUT) {
            Ok(latency) => {
                writeln!(
                    stdout,
                    "Reply from {}: time={:.2}ms\n",
                    self.host,
                    latency.as_secs_f64() * 1000.0
                )?;
                Ok(Flow::Continue)
            }
            Err(ProbeError::Timeout) => Err(ShellError::Timeout(format!(
                "Request timed out for {}.",
                self.host
            ))),
            Err(ProbeError::Resolve(_)) => Err(ShellError::NotFound(format!(
                "Ping request could not find host {}. Please check the name and try again.",
                self.host
            ))),
            Err(err @ ProbeError::Connect(_)) => {
                warn!(host = %self.host, error = %err, "ping failed");
                Err(ShellError::Collaborator(err.to_string()))
            }
        }
    }
}

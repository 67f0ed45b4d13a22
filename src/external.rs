//! Process and network facilities the builtins lean on.

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::process::Command;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Run `ps aux` and return whatever it printed.
pub fn list_processes() -> io::Result<String> {
    debug!("spawning ps aux");
    let output = Command::new("ps").arg("aux").output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(format!(
            "ps exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Send SIGKILL to `pid`.
pub fn terminate(pid: i32) -> nix::Result<()> {
    debug!(pid, "sending SIGKILL");
    signal::kill(Pid::from_raw(pid), Signal::SIGKILL)
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not resolve host: {0}")]
    Resolve(io::Error),

    #[error("connection timed out")]
    Timeout,

    #[error("{0}")]
    Connect(io::Error),
}

/// Open and immediately drop a TCP connection to `host:port`.
///
/// Returns the time from the start of name resolution until the connection
/// was established. Each resolved address gets its own `timeout`.
pub fn probe(host: &str, port: u16, timeout: Duration) -> Result<Duration, ProbeError> {
    let start = Instant::now();
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(ProbeError::Resolve)?
        .collect();

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => {
                let elapsed = start.elapsed();
                debug!(%addr, ?elapsed, "probe connected");
                return Ok(elapsed);
            }
            Err(err) if err.kind() == io::ErrorKind::TimedOut => {
                last_error = Some(ProbeError::Timeout)
            }
            Err(err) => last_error = Some(ProbeError::Connect(err)),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ProbeError::Resolve(io::Error::new(
            io::ErrorKind::NotFound,
            "no addresses found",
        ))
    }))
}

// ABOUTME: Subprocess error types with SNAFU pattern.
// ABOUTME: Separates spawn failures from deadline expiry for programmatic handling.

use snafu::Snafu;
use std::time::Duration;

/// Failure to run a command at all (as opposed to a non-zero exit).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExecError {
    #[snafu(display("failed to spawn `{command}`: {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` timed out after {}s", timeout.as_secs()))]
    Timeout { command: String, timeout: Duration },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    /// Program missing or not executable.
    NotFound,
    /// Any other spawn or wait failure.
    Io,
    /// Deadline elapsed before the command finished.
    Timeout,
}

impl ExecError {
    pub fn kind(&self) -> ExecErrorKind {
        match self {
            ExecError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ExecErrorKind::NotFound
            }
            ExecError::Spawn { .. } => ExecErrorKind::Io,
            ExecError::Timeout { .. } => ExecErrorKind::Timeout,
        }
    }

    /// The command line that failed.
    pub fn command(&self) -> &str {
        match self {
            ExecError::Spawn { command, .. } | ExecError::Timeout { command, .. } => command,
        }
    }
}

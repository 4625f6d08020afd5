// ABOUTME: CommandRunner backed by real child processes.
// ABOUTME: Every call is bounded by a deadline; a hung CLI becomes an ExecError::Timeout.

use async_trait::async_trait;
use snafu::ResultExt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::error::{ExecError, SpawnSnafu};
use super::{CommandOutput, CommandRunner, CommandSpec, StdioMode};

/// Runs commands as local child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_inner(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        match spec.stdio {
            StdioMode::Captured => {
                let output = command
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .await
                    .context(SpawnSnafu {
                        command: spec.command_line(),
                    })?;

                Ok(CommandOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            StdioMode::Inherited => {
                let status = command
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await
                    .context(SpawnSnafu {
                        command: spec.command_line(),
                    })?;

                Ok(CommandOutput {
                    exit_code: status.code(),
                    ..Default::default()
                })
            }
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        tracing::debug!(command = %spec, "running command");

        match tokio::time::timeout(self.timeout, self.run_inner(spec)).await {
            Ok(result) => result,
            Err(_) => Err(ExecError::Timeout {
                command: spec.command_line(),
                timeout: self.timeout,
            }),
        }
    }
}

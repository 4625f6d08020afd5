// ABOUTME: Narrow command-execution seam for every external CLI the pipeline drives.
// ABOUTME: git, npm, and vercel calls go through CommandRunner so tests can script them.

mod error;
mod system;

pub use error::{ExecError, ExecErrorKind};
pub use system::SystemRunner;

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// How a child process's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Capture stdout/stderr for inspection.
    #[default]
    Captured,
    /// Stream to the terminal (build logs, push progress). Nothing is captured.
    Inherited,
}

/// A command to execute: program, arguments, and where to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub stdio: StdioMode,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            stdio: StdioMode::Captured,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn inherit_stdio(mut self) -> Self {
        self.stdio = StdioMode::Inherited;
        self
    }

    /// The command line as a single string, for logs and test assertions.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// A successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Short human-readable reason for a failure.
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        match (self.exit_code, stderr.is_empty()) {
            (Some(code), true) => format!("exit code {code}"),
            (Some(code), false) => format!("exit code {code}: {stderr}"),
            (None, true) => "terminated by signal".to_string(),
            (None, false) => format!("terminated by signal: {stderr}"),
        }
    }
}

/// Runs external commands.
///
/// A non-zero exit is not an error at this layer: callers inspect
/// [`CommandOutput::success`] because several steps treat failure as normal
/// (removing an absent remote, `git diff-index` reporting changes).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError>;
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        (**self).run(spec).await
    }
}

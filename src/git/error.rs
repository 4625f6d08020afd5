// ABOUTME: Error types for the local git push step.
// ABOUTME: Any of these aborts the pipeline and triggers failure cleanup.

use thiserror::Error;

use crate::exec::{CommandOutput, ExecError};
use crate::types::BranchNameError;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("not in a git repository: {0}")]
    NotACheckout(String),

    #[error("cannot derive SSH remote from clone URL {url}: {reason}")]
    InvalidCloneUrl { url: String, reason: String },

    #[error("`git {command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("push of branch {branch} was rejected: {reason}")]
    Rejected { branch: String, reason: String },

    #[error(transparent)]
    Branch(#[from] BranchNameError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl PushError {
    pub(crate) fn command(args: &[&str], output: &CommandOutput) -> Self {
        PushError::Command {
            command: args.join(" "),
            reason: output.failure_reason(),
        }
    }
}

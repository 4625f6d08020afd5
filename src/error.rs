// ABOUTME: Application-wide error types for hoist.
// ABOUTME: Uses thiserror; kind() groups variants into the pipeline's failure taxonomy.

use std::path::PathBuf;
use thiserror::Error;

use crate::build::BuildError;
use crate::deploy::TransitionError;
use crate::exec::ExecError;
use crate::git::PushError;
use crate::github::GitHubError;
use crate::types::{BranchNameError, RepoNameError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid repository name: {0}")]
    InvalidRepoName(#[from] RepoNameError),

    #[error("invalid branch name: {0}")]
    InvalidBranch(#[from] BranchNameError),

    #[error("GitHub token is required (pass --token or save one with a previous run)")]
    MissingToken,

    #[error("invalid GitHub token: {0}")]
    InvalidToken(String),

    #[error("repository {name} already exists and could not be deleted for recreation")]
    Conflict { name: String },

    #[error("failed to push code: {0}")]
    Push(#[from] PushError),

    #[error("build validation failed: {0}")]
    Build(#[from] BuildError),

    #[error("deployment failed: {0}")]
    Deployment(String),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("{0}")]
    Exec(#[from] ExecError),

    #[error("invalid run state: {0}")]
    State(#[from] TransitionError),

    #[error("deployment interrupted")]
    Interrupted,

    #[error("unexpected failure: {0}")]
    Unexpected(String),

    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure categories, used for reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input rejected before any external call.
    InvalidInput,
    /// Missing or rejected token. Nothing has been created yet.
    Authentication,
    /// Repository name taken and force-recreate could not clear it.
    Conflict,
    /// Not a checkout, or git refused a step.
    Push,
    /// Manifest or build script missing, or build exited non-zero.
    Build,
    /// Hosting CLI failure, or a source host API failure mid-pipeline.
    Deployment,
    /// Ctrl-C or signal.
    Interrupted,
    /// Panic or other unclassified failure.
    Unexpected,
    /// Config file or local environment problem.
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRepoName(_) | Error::InvalidBranch(_) => ErrorKind::InvalidInput,
            Error::MissingToken | Error::InvalidToken(_) => ErrorKind::Authentication,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::Push(_) => ErrorKind::Push,
            Error::Build(_) => ErrorKind::Build,
            Error::Deployment(_) | Error::GitHub(_) | Error::Exec(_) => ErrorKind::Deployment,
            Error::Interrupted => ErrorKind::Interrupted,
            Error::Unexpected(_) | Error::State(_) => ErrorKind::Unexpected,
            Error::ConfigNotFound(_)
            | Error::InvalidConfig(_)
            | Error::Io(_)
            | Error::Yaml(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

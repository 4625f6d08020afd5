// ABOUTME: Deployment branch name resolution.
// ABOUTME: Explicit flag wins over the environment, which wins over a name derived from the repo.

use std::fmt;
use thiserror::Error;

use super::RepoName;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BranchNameError {
    #[error("branch name cannot be empty")]
    Empty,

    #[error("branch name cannot start with '-': {0}")]
    LeadingHyphen(String),

    #[error("branch name cannot contain whitespace: {0}")]
    Whitespace(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Accept a user-supplied branch name.
    ///
    /// Only guards against values git would read as an option or split on;
    /// git itself enforces the rest of its ref format.
    pub fn new(value: &str) -> Result<Self, BranchNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(BranchNameError::Empty);
        }
        if value.starts_with('-') {
            return Err(BranchNameError::LeadingHyphen(value.to_string()));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(BranchNameError::Whitespace(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Derive a branch from a repository name: every character outside
    /// `[A-Za-z0-9-_]` becomes `-`, then the result is lower-cased.
    pub fn derive(source: &str) -> Self {
        let sanitized: String = source
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        Self(sanitized)
    }

    /// Pick the deployment branch.
    ///
    /// Priority: explicit request > environment override > derived from the repo name.
    /// Empty values at either of the first two levels are treated as unset.
    pub fn resolve(
        explicit: Option<&str>,
        env_override: Option<&str>,
        repo: &RepoName,
    ) -> Result<Self, BranchNameError> {
        fn pick(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.trim().is_empty())
        }

        if let Some(branch) = pick(explicit) {
            return Self::new(branch);
        }
        if let Some(branch) = pick(env_override) {
            return Self::new(branch);
        }
        Ok(Self::derive(repo.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

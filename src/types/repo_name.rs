// ABOUTME: GitHub repository name validation.
// ABOUTME: Accepts ASCII letters, digits, dot, hyphen, and underscore only.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoNameError {
    #[error("repository name is required")]
    Empty,

    #[error("invalid character in repository name: '{0}' (allowed: A-Z a-z 0-9 . _ -)")]
    InvalidChar(char),
}

/// A repository name matching `[A-Za-z0-9._-]+`.
///
/// Validation is purely lexical so a bad name is rejected before any
/// network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName(String);

impl RepoName {
    pub fn new(value: &str) -> Result<Self, RepoNameError> {
        if value.is_empty() {
            return Err(RepoNameError::Empty);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '.' && c != '_' && c != '-' {
                return Err(RepoNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RepoName {
    type Err = RepoNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ABOUTME: Hosting project names generated fresh for every deploy.
// ABOUTME: Repository name plus a millisecond timestamp so no run reuses stale project state.

use chrono::Utc;
use std::fmt;

use super::RepoName;

/// Name of a hosting project created by this tool.
#[must_use = "project names identify remote resources and should not be ignored"]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Generate a new project name for `repo` using the current time.
    pub fn generate(repo: &RepoName) -> Self {
        Self::with_stamp(repo, Utc::now().timestamp_millis())
    }

    /// Build a project name with an explicit disambiguator.
    ///
    /// Vercel only accepts lowercase project names, so the repository part is lowered.
    pub fn with_stamp(repo: &RepoName, stamp: i64) -> Self {
        Self(format!("{}-{}", repo.as_str().to_ascii_lowercase(), stamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

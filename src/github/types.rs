// ABOUTME: Wire and domain types for GitHub repositories and identities.
// ABOUTME: Raw payloads are flattened into RemoteRepository for the rest of the pipeline.

use serde::{Deserialize, Serialize};

use crate::types::RepoName;

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub login: String,
}

/// Outcome of authenticating a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    Valid(Identity),
    /// Rejected by the host, with its error message.
    Invalid(String),
}

/// A repository on the source host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub owner: String,
    pub name: String,
    pub clone_url: String,
    pub html_url: String,
    pub private: bool,
}

impl RemoteRepository {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Existence check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoLookup {
    Present(RemoteRepository),
    Absent,
    /// Lookup itself failed; the pipeline treats this as absent after logging.
    Failed(String),
}

impl RepoLookup {
    pub fn exists(&self) -> bool {
        matches!(self, RepoLookup::Present(_))
    }
}

/// Parameters for repository creation.
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: RepoName,
    pub description: Option<String>,
    pub private: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRepoBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
    pub auto_init: bool,
}

impl<'a> From<&'a NewRepository> for CreateRepoBody<'a> {
    fn from(repo: &'a NewRepository) -> Self {
        Self {
            name: repo.name.as_str(),
            description: repo.description.as_deref().unwrap_or(""),
            private: repo.private,
            auto_init: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepoPayload {
    pub name: String,
    pub owner: Identity,
    pub clone_url: String,
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
}

impl From<RepoPayload> for RemoteRepository {
    fn from(raw: RepoPayload) -> Self {
        Self {
            owner: raw.owner.login,
            name: raw.name,
            clone_url: raw.clone_url,
            html_url: raw.html_url,
            private: raw.private,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
}

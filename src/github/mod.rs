// ABOUTME: Source-host side of the pipeline: token check, lookup, create, delete.
// ABOUTME: RepositoryHost is the seam; GitHubClient talks to the REST API over reqwest.

mod client;
mod ensure;
mod error;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use ensure::{EnsureAction, EnsuredRepository, ensure_repository, ensure_repository_with};
pub use error::GitHubError;
pub use types::{Identity, NewRepository, RemoteRepository, RepoLookup, TokenCheck};

use async_trait::async_trait;

use crate::credentials::Credential;
use crate::types::RepoName;

/// Operations the pipeline needs from the source host.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Authenticate and resolve the caller's identity.
    async fn validate_token(&self, credential: &Credential) -> Result<TokenCheck, GitHubError>;

    /// Check whether `<caller>/<name>` exists.
    async fn lookup(
        &self,
        credential: &Credential,
        name: &RepoName,
    ) -> Result<RepoLookup, GitHubError>;

    /// Create an empty repository owned by the caller.
    async fn create(
        &self,
        credential: &Credential,
        repo: &NewRepository,
    ) -> Result<RemoteRepository, GitHubError>;

    /// Delete `<caller>/<name>`. `Ok(false)` means the host refused.
    async fn delete(&self, credential: &Credential, name: &RepoName) -> Result<bool, GitHubError>;
}

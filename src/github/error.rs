// ABOUTME: Error types for the GitHub REST client.
// ABOUTME: Separates transport failures from non-success API responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: u16, message: String },
}

impl GitHubError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

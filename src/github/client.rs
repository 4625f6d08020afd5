// ABOUTME: GitHub REST API client over reqwest.
// ABOUTME: Token goes only into the Authorization header and is never logged.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::GitHubError;
use super::types::{
    CreateRepoBody, ErrorPayload, Identity, NewRepository, RemoteRepository, RepoLookup,
    RepoPayload, TokenCheck,
};
use super::RepositoryHost;
use crate::credentials::Credential;
use crate::types::RepoName;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a client for `api_url` whose requests give up after `timeout`.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hoist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitHubError::Client)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str, credential: &Credential) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        debug!("{} {}", method, url);

        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("token {}", credential.expose()))
            .header(header::ACCEPT, ACCEPT)
    }

    /// Resolve the token's owner. Non-success becomes `GitHubError::Api`.
    async fn identity(&self, credential: &Credential) -> Result<Identity, GitHubError> {
        let response = self
            .request(Method::GET, "/user", credential)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Turn a non-success response into `GitHubError::Api`, keeping the host's message.
async fn api_error(response: Response) -> GitHubError {
    let status = response.status();
    let payload = response.json::<ErrorPayload>().await.unwrap_or_default();
    let message = payload.message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    GitHubError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn validate_token(&self, credential: &Credential) -> Result<TokenCheck, GitHubError> {
        match self.identity(credential).await {
            Ok(identity) => {
                debug!(login = %identity.login, "token validated");
                Ok(TokenCheck::Valid(identity))
            }
            Err(GitHubError::Api { message, .. }) => Ok(TokenCheck::Invalid(message)),
            Err(e) => Err(e),
        }
    }

    async fn lookup(
        &self,
        credential: &Credential,
        name: &RepoName,
    ) -> Result<RepoLookup, GitHubError> {
        let owner = match self.identity(credential).await {
            Ok(identity) => identity.login,
            Err(GitHubError::Api { message, .. }) => {
                warn!("failed to get user info for repository lookup: {}", message);
                return Ok(RepoLookup::Failed(format!("failed to get user info: {message}")));
            }
            Err(e) => return Err(e),
        };

        let path = format!("/repos/{}/{}", owner, name);
        let response = self.request(Method::GET, &path, credential).send().await?;

        match response.status() {
            status if status.is_success() => {
                let repo: RepoPayload = response.json().await?;
                Ok(RepoLookup::Present(repo.into()))
            }
            StatusCode::NOT_FOUND => Ok(RepoLookup::Absent),
            _ => {
                let err = api_error(response).await;
                warn!("error checking repository {}/{}: {}", owner, name, err);
                Ok(RepoLookup::Failed(err.to_string()))
            }
        }
    }

    async fn create(
        &self,
        credential: &Credential,
        repo: &NewRepository,
    ) -> Result<RemoteRepository, GitHubError> {
        let response = self
            .request(Method::POST, "/user/repos", credential)
            .json(&CreateRepoBody::from(repo))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let created: RepoPayload = response.json().await?;
        Ok(created.into())
    }

    async fn delete(&self, credential: &Credential, name: &RepoName) -> Result<bool, GitHubError> {
        let owner = match self.identity(credential).await {
            Ok(identity) => identity.login,
            Err(GitHubError::Api { message, .. }) => {
                warn!("failed to get user info for repository deletion: {}", message);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let path = format!("/repos/{}/{}", owner, name);
        let response = self
            .request(Method::DELETE, &path, credential)
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(true);
        }

        let err = api_error(response).await;
        warn!("failed to delete repository {}/{}: {}", owner, name, err);
        Ok(false)
    }
}

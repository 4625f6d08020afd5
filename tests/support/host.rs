// ABOUTME: In-memory RepositoryHost that records calls and can be told to refuse or panic.
// ABOUTME: Repositories live in a set keyed by name under a single fixed owner.

use async_trait::async_trait;
use hoist::credentials::Credential;
use hoist::github::{
    GitHubError, Identity, NewRepository, RemoteRepository, RepoLookup, RepositoryHost, TokenCheck,
};
use hoist::types::RepoName;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

pub const OWNER: &str = "octo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Validate,
    Lookup(String),
    Create(String),
    Delete(String),
}

#[derive(Default)]
struct State {
    existing: HashSet<String>,
    calls: Vec<HostCall>,
    tokens_seen: Vec<String>,
}

#[derive(Default)]
pub struct FakeHost {
    state: Mutex<State>,
    reject_token: bool,
    refuse_delete: bool,
    panic_on_create: bool,
    create_delay: Option<Duration>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(self, name: &str) -> Self {
        self.state.lock().existing.insert(name.to_string());
        self
    }

    pub fn rejecting_token(mut self) -> Self {
        self.reject_token = true;
        self
    }

    pub fn refusing_delete(mut self) -> Self {
        self.refuse_delete = true;
        self
    }

    pub fn panicking_on_create(mut self) -> Self {
        self.panic_on_create = true;
        self
    }

    /// `create` stores the repository, then takes `delay` to answer.
    pub fn slow_create(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.state.lock().existing.contains(name)
    }

    /// Raw token values the host was called with.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.state.lock().tokens_seen.clone()
    }

    fn record(&self, credential: &Credential, call: HostCall) {
        let mut state = self.state.lock();
        state.tokens_seen.push(credential.expose().to_string());
        state.calls.push(call);
    }
}

pub fn repository(name: &str) -> RemoteRepository {
    RemoteRepository {
        owner: OWNER.to_string(),
        name: name.to_string(),
        clone_url: format!("https://github.com/{OWNER}/{name}.git"),
        html_url: format!("https://github.com/{OWNER}/{name}"),
        private: true,
    }
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn validate_token(&self, credential: &Credential) -> Result<TokenCheck, GitHubError> {
        self.record(credential, HostCall::Validate);
        if self.reject_token {
            return Ok(TokenCheck::Invalid("Bad credentials".to_string()));
        }
        Ok(TokenCheck::Valid(Identity {
            login: OWNER.to_string(),
        }))
    }

    async fn lookup(
        &self,
        credential: &Credential,
        name: &RepoName,
    ) -> Result<RepoLookup, GitHubError> {
        self.record(credential, HostCall::Lookup(name.to_string()));
        if self.exists(name.as_str()) {
            Ok(RepoLookup::Present(repository(name.as_str())))
        } else {
            Ok(RepoLookup::Absent)
        }
    }

    async fn create(
        &self,
        credential: &Credential,
        repo: &NewRepository,
    ) -> Result<RemoteRepository, GitHubError> {
        self.record(credential, HostCall::Create(repo.name.to_string()));
        if self.panic_on_create {
            panic!("host exploded");
        }
        self.state.lock().existing.insert(repo.name.to_string());
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        let mut created = repository(repo.name.as_str());
        created.private = repo.private;
        Ok(created)
    }

    async fn delete(&self, credential: &Credential, name: &RepoName) -> Result<bool, GitHubError> {
        self.record(credential, HostCall::Delete(name.to_string()));
        if self.refuse_delete {
            return Ok(false);
        }
        Ok(self.state.lock().existing.remove(name.as_str()))
    }
}

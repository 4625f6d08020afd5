// ABOUTME: The immutable description of one deploy run.
// ABOUTME: Built once from the command line, validated before any network call.

use crate::credentials::Credential;
use crate::github::NewRepository;
use crate::types::RepoName;

/// Repository visibility on the source host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn is_private(self) -> bool {
        self == Visibility::Private
    }
}

/// What to deploy and how.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub repo: RepoName,
    pub description: Option<String>,
    pub visibility: Visibility,
    /// Explicit branch; wins over the environment.
    pub branch: Option<String>,
    /// Token supplied on the command line; replaces the saved one once validated.
    pub token: Option<Credential>,
    pub force_recreate: bool,
    pub skip_build_validation: bool,
    pub skip_hosting_deploy: bool,
    pub verbose: bool,
}

impl DeployRequest {
    /// Request with defaults: private, no overrides, every step enabled.
    pub fn new(repo: RepoName) -> Self {
        Self {
            repo,
            description: None,
            visibility: Visibility::Private,
            branch: None,
            token: None,
            force_recreate: false,
            skip_build_validation: false,
            skip_hosting_deploy: false,
            verbose: false,
        }
    }

    /// Build validation runs only when there is a deploy to protect.
    pub fn runs_build_validation(&self) -> bool {
        !self.skip_hosting_deploy && !self.skip_build_validation
    }

    pub fn new_repository(&self) -> NewRepository {
        NewRepository {
            name: self.repo.clone(),
            description: self.description.clone(),
            private: self.visibility.is_private(),
        }
    }
}

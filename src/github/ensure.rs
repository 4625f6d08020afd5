// ABOUTME: Existence policy for the target repository.
// ABOUTME: Reuse by default; with force, delete then create, never create after a failed delete.

use tracing::{info, warn};

use super::{NewRepository, RemoteRepository, RepoLookup, RepositoryHost};
use crate::credentials::Credential;
use crate::error::{Error, Result};

/// What `ensure_repository` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureAction {
    Created,
    Reused,
    Recreated,
}

/// A repository ready to receive a push.
#[derive(Debug, Clone)]
pub struct EnsuredRepository {
    pub repository: RemoteRepository,
    pub action: EnsureAction,
}

impl EnsuredRepository {
    /// Whether this run created the repository (and so owns its deletion on failure).
    pub fn created(&self) -> bool {
        matches!(self.action, EnsureAction::Created | EnsureAction::Recreated)
    }
}

/// Make sure `<caller>/<repo.name>` exists.
///
/// - absent (or lookup failed): create it
/// - present, `force == false`: reuse it, `create` is never called
/// - present, `force == true`: delete it, then create; a failed delete aborts
///   with [`Error::Conflict`] before `create` is attempted
pub async fn ensure_repository<H: RepositoryHost + ?Sized>(
    host: &H,
    credential: &Credential,
    repo: &NewRepository,
    force: bool,
) -> Result<EnsuredRepository> {
    ensure_repository_with(host, credential, repo, force, || {}).await
}

/// [`ensure_repository`], calling `before_create` just before the create request is sent.
///
/// Once the request is out the repository may exist even if the call never returns,
/// so callers that can be interrupted record ownership here rather than on success.
pub async fn ensure_repository_with<H, F>(
    host: &H,
    credential: &Credential,
    repo: &NewRepository,
    force: bool,
    before_create: F,
) -> Result<EnsuredRepository>
where
    H: RepositoryHost + ?Sized,
    F: FnOnce(),
{
    let existing = match host.lookup(credential, &repo.name).await? {
        RepoLookup::Present(existing) => Some(existing),
        RepoLookup::Absent => None,
        RepoLookup::Failed(reason) => {
            warn!("repository lookup failed, assuming it does not exist: {}", reason);
            None
        }
    };

    let action = match existing {
        Some(existing) if !force => {
            info!(url = %existing.html_url, "reusing existing repository");
            return Ok(EnsuredRepository {
                repository: existing,
                action: EnsureAction::Reused,
            });
        }
        Some(existing) => {
            warn!(url = %existing.html_url, "repository exists and force is set, deleting it");
            if !host.delete(credential, &repo.name).await? {
                return Err(Error::Conflict {
                    name: existing.full_name(),
                });
            }
            EnsureAction::Recreated
        }
        None => EnsureAction::Created,
    };

    before_create();
    let repository = host.create(credential, repo).await?;
    info!(url = %repository.html_url, "repository created");

    Ok(EnsuredRepository { repository, action })
}

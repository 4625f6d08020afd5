// ABOUTME: Compensating cleanup after a run: local tidy-up on success, full rollback on failure.
// ABOUTME: Every action is best-effort and reported individually; nothing here returns an error.

mod report;

pub use report::{CleanupAction, CleanupOutcome, CleanupReport};

use std::sync::Arc;

use crate::credentials::Credential;
use crate::diagnostics::{Diagnostics, Warning};
use crate::git::GitController;
use crate::github::{RepoLookup, RepositoryHost};
use crate::hosting::{self, HostingDeployer, LINK_DIR, MANIFEST_FILENAME};
use crate::output::Output;
use crate::types::{ProjectName, RepoName};

/// What this run created, and therefore what cleanup may remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupRecord {
    /// The remote repository was created (or recreated) by this run.
    pub repository_created: bool,
    /// A hosting deployment was issued under this project name.
    pub hosting_project: Option<ProjectName>,
    /// `vercel.json` was written by this run.
    pub manifest_created: bool,
}

/// Runs post-success and failure cleanup.
#[derive(Clone)]
pub struct CleanupCoordinator {
    host: Arc<dyn RepositoryHost>,
    git: GitController,
    hosting: HostingDeployer,
}

impl CleanupCoordinator {
    pub fn new(host: Arc<dyn RepositoryHost>, git: GitController, hosting: HostingDeployer) -> Self {
        Self { host, git, hosting }
    }

    /// Remove local tracking artifacts so the next run starts fresh.
    pub async fn post_success(
        &self,
        repo: &RepoName,
        record: &CleanupRecord,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> CleanupReport {
        let mut report = CleanupReport::default();

        let remote = format!("git remote {repo}");
        let outcome = match self.git.remove_remote(repo.as_str()).await {
            Ok(true) => CleanupOutcome::Removed,
            Ok(false) => CleanupOutcome::NotPresent,
            Err(e) => CleanupOutcome::Failed(e.to_string()),
        };
        report.record(remote, outcome);

        if record.manifest_created {
            let path = self.hosting.workdir().join(MANIFEST_FILENAME);
            report.record(
                MANIFEST_FILENAME,
                hosting::remove_file_if_present(&path).into(),
            );
        }

        report.record(format!("{LINK_DIR}/"), self.hosting.unlink().into());

        for action in report.actions() {
            match &action.outcome {
                CleanupOutcome::Removed => output.progress(&format!("Removed {}", action.target)),
                CleanupOutcome::NotPresent => {
                    tracing::debug!("no {} to remove", action.target)
                }
                CleanupOutcome::Failed(reason) => diag.warn(Warning::cleanup(format!(
                    "could not remove {}: {}",
                    action.target, reason
                ))),
            }
        }

        report
    }

    /// Undo everything this run created, then run local cleanup.
    ///
    /// The repository is deleted only if this run created it; a reused repository
    /// is left in place. Never fails: each action is announced, attempted, and its
    /// outcome reported on its own.
    pub async fn on_failure(
        &self,
        credential: Option<&Credential>,
        repo: &RepoName,
        record: &CleanupRecord,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> CleanupReport {
        let mut report = CleanupReport::default();

        if record.repository_created || record.hosting_project.is_some() {
            output.progress("Deleting resources created by this run...");
        }

        if record.repository_created {
            let target = format!("GitHub repository {repo}");
            output.progress(&format!("Deleting {target}..."));
            let outcome = match credential {
                Some(credential) => self.delete_repository(credential, repo).await,
                None => CleanupOutcome::Failed("no token available".to_string()),
            };
            announce(&target, &outcome, output, diag);
            report.record(target, outcome);
        }

        if let Some(project) = &record.hosting_project {
            let target = format!("Vercel project {project}");
            output.progress(&format!("Deleting {target}..."));
            let outcome = match self.hosting.remove_project(project).await {
                Ok(true) => CleanupOutcome::Removed,
                Ok(false) => CleanupOutcome::Failed(
                    "vercel CLI could not remove it; delete it from the Vercel dashboard"
                        .to_string(),
                ),
                Err(e) => CleanupOutcome::Failed(e.to_string()),
            };
            announce(&target, &outcome, output, diag);
            report.record(target, outcome);
        }

        let local = self.post_success(repo, record, output, diag).await;
        report.extend(local);
        report
    }

    /// Delete the repository. A refusal for a repository that turns out not to
    /// exist (a create that never landed) counts as already gone.
    async fn delete_repository(&self, credential: &Credential, repo: &RepoName) -> CleanupOutcome {
        match self.host.delete(credential, repo).await {
            Ok(true) => CleanupOutcome::Removed,
            Ok(false) => match self.host.lookup(credential, repo).await {
                Ok(RepoLookup::Absent) => CleanupOutcome::NotPresent,
                _ => CleanupOutcome::Failed("GitHub refused the deletion".to_string()),
            },
            Err(e) => CleanupOutcome::Failed(e.to_string()),
        }
    }
}

fn announce(target: &str, outcome: &CleanupOutcome, output: &Output, diag: &mut Diagnostics) {
    match outcome {
        CleanupOutcome::Removed => output.done(&format!("Deleted {target}")),
        CleanupOutcome::NotPresent => output.done(&format!("{target} already gone")),
        CleanupOutcome::Failed(reason) => {
            output.failed(&format!("Failed to delete {target}: {reason}"));
            diag.warn(Warning::cleanup(format!(
                "{target} may need manual deletion: {reason}"
            )));
        }
    }
}

// ABOUTME: Local git driver: remote registration, staging, commit, branch switch, force-push.
// ABOUTME: Every git invocation goes through CommandRunner inside the working directory.

mod error;
mod remote_url;

pub use error::PushError;
pub use remote_url::ssh_remote_url;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};
use crate::types::{BranchName, RepoName};

const COMMIT_MESSAGE: &str = "Initial deployment: Push source code";

/// Drives the `git` CLI in one working tree.
#[derive(Clone)]
pub struct GitController {
    runner: Arc<dyn CommandRunner>,
    workdir: PathBuf,
    env_branch: Option<String>,
    ssh_host: Option<String>,
}

impl GitController {
    pub fn new(runner: Arc<dyn CommandRunner>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
            env_branch: None,
            ssh_host: None,
        }
    }

    /// Branch taken from the environment when no explicit branch is requested.
    pub fn env_branch(mut self, branch: Option<String>) -> Self {
        self.env_branch = branch;
        self
    }

    /// Replace the host in generated SSH remote URLs (e.g. an ssh config alias).
    pub fn ssh_host(mut self, host: Option<String>) -> Self {
        self.ssh_host = host;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn git(&self, args: &[&str]) -> Result<CommandOutput, ExecError> {
        let spec = CommandSpec::new("git", args.iter().copied()).current_dir(&self.workdir);
        self.runner.run(&spec).await
    }

    /// Run git and turn a non-zero exit into [`PushError::Command`].
    async fn require(&self, args: &[&str]) -> Result<CommandOutput, PushError> {
        let output = self.git(args).await?;
        if !output.success() {
            return Err(PushError::command(args, &output));
        }
        Ok(output)
    }

    /// Whether a remote called `name` is registered.
    pub async fn has_remote(&self, name: &str) -> Result<bool, ExecError> {
        let output = self.git(&["remote"]).await?;
        Ok(output.success() && output.stdout.lines().any(|line| line.trim() == name))
    }

    /// Remove a remote. Returns `false` if git refused (usually: no such remote).
    pub async fn remove_remote(&self, name: &str) -> Result<bool, ExecError> {
        Ok(self.git(&["remote", "remove", name]).await?.success())
    }

    /// Rename a remote. Returns `false` if git refused.
    pub async fn rename_remote(&self, from: &str, to: &str) -> Result<bool, ExecError> {
        Ok(self.git(&["remote", "rename", from, to]).await?.success())
    }

    /// Push the working tree to `clone_url` on the deployment branch.
    ///
    /// Safe to repeat: a stale remote named after the repository is removed first,
    /// and a clean tree produces no commit.
    pub async fn push(
        &self,
        clone_url: &str,
        repo: &RepoName,
        branch_override: Option<&str>,
    ) -> Result<BranchName, PushError> {
        let status = self.git(&["status"]).await?;
        if !status.success() {
            return Err(PushError::NotACheckout(status.failure_reason()));
        }

        if self.remove_remote(repo.as_str()).await? {
            tracing::debug!(remote = %repo, "removed stale remote");
        }

        let remote_url = ssh_remote_url(clone_url, self.ssh_host.as_deref())?;
        self.require(&["remote", "add", repo.as_str(), remote_url.as_str()])
            .await?;
        tracing::debug!(remote = %repo, url = %remote_url, "registered remote");

        self.require(&["add", "-A"]).await?;

        let clean = self
            .git(&["diff-index", "--quiet", "HEAD", "--"])
            .await?
            .success();
        if clean {
            tracing::debug!("working tree matches HEAD, skipping commit");
        } else {
            self.require(&["commit", "-m", COMMIT_MESSAGE]).await?;
        }

        let branch = BranchName::resolve(branch_override, self.env_branch.as_deref(), repo)?;
        self.switch_branch(&branch).await?;

        let push = CommandSpec::new(
            "git",
            ["push", "-u", repo.as_str(), branch.as_str(), "--force"],
        )
        .current_dir(&self.workdir)
        .inherit_stdio();
        let output = self.runner.run(&push).await?;
        if !output.success() {
            return Err(PushError::Rejected {
                branch: branch.to_string(),
                reason: output.failure_reason(),
            });
        }

        Ok(branch)
    }

    /// Create and switch to `branch`, or switch to it if it already exists.
    async fn switch_branch(&self, branch: &BranchName) -> Result<(), PushError> {
        if self
            .git(&["checkout", "-b", branch.as_str()])
            .await?
            .success()
        {
            return Ok(());
        }
        self.require(&["checkout", branch.as_str()]).await?;
        Ok(())
    }
}

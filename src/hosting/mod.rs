// ABOUTME: Vercel deployment through the vercel CLI.
// ABOUTME: Fresh project per run, best-effort git link, project listing and removal for cleanup.

pub mod manifest;

pub use manifest::MANIFEST_FILENAME;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::exec::{CommandRunner, CommandSpec, ExecError};
use crate::git::GitController;
use crate::types::{ProjectName, RepoName};

/// Local directory where the vercel CLI records the project link.
pub const LINK_DIR: &str = ".vercel";

const ORIGIN: &str = "origin";
const ORIGIN_BACKUP: &str = "origin-backup";

/// Deploys the working tree to Vercel.
#[derive(Clone)]
pub struct HostingDeployer {
    runner: Arc<dyn CommandRunner>,
    git: GitController,
    workdir: PathBuf,
    cli: String,
    builder: String,
}

impl HostingDeployer {
    pub fn new(runner: Arc<dyn CommandRunner>, git: GitController) -> Self {
        let workdir = git.workdir().to_path_buf();
        Self {
            runner,
            git,
            workdir,
            cli: "vercel".to_string(),
            builder: "@vercel/next".to_string(),
        }
    }

    /// Builder written into a generated manifest.
    pub fn builder(mut self, builder: impl Into<String>) -> Self {
        self.builder = builder.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn vercel<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(&self.cli, args).current_dir(&self.workdir)
    }

    /// Name for this run's project. Never reuses a previous project.
    pub fn new_project(&self, repo: &RepoName) -> ProjectName {
        ProjectName::generate(repo)
    }

    /// Drop a stale local project link so the deploy cannot attach to an old project.
    pub fn prepare(&self) -> std::io::Result<bool> {
        remove_dir_if_present(&self.workdir.join(LINK_DIR))
    }

    /// Write `vercel.json` if the project has none. `true` if this call created it.
    pub fn write_manifest(&self) -> std::io::Result<bool> {
        manifest::write_if_absent(&self.workdir, &self.builder)
    }

    /// Create a production deployment under `project`.
    pub async fn deploy(&self, project: &ProjectName) -> Result<()> {
        let command = self
            .vercel(["--prod", "--yes", "--name", project.as_str()])
            .inherit_stdio();
        tracing::info!(project = %project, "creating production deployment");

        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(Error::Deployment(format!(
                "`{}` failed with {}",
                command.command_line(),
                output.failure_reason()
            )));
        }
        Ok(())
    }

    /// Connect the linked project to the pushed repository.
    ///
    /// `origin` is parked under another name for the duration so the CLI picks the
    /// deployment remote, and is always put back. Failures are recorded as link
    /// warnings; returns whether the link succeeded.
    pub async fn link(&self, diag: &mut Diagnostics) -> bool {
        let renamed = match self.git.has_remote(ORIGIN).await {
            Ok(true) => match self.git.rename_remote(ORIGIN, ORIGIN_BACKUP).await {
                Ok(true) => {
                    tracing::debug!("temporarily renamed origin remote");
                    true
                }
                Ok(false) => {
                    tracing::debug!("origin remote could not be renamed, linking anyway");
                    false
                }
                Err(e) => {
                    tracing::debug!("origin rename failed: {}", e);
                    false
                }
            },
            _ => false,
        };

        let linked = match self.runner.run(&self.vercel(["git", "connect", "--yes"])).await {
            Ok(output) if output.success() => true,
            Ok(output) => {
                diag.warn(Warning::link(format!(
                    "could not link project with the GitHub repository ({}); link it from the Vercel dashboard",
                    output.failure_reason()
                )));
                false
            }
            Err(e) => {
                diag.warn(Warning::link(format!(
                    "could not link project with the GitHub repository: {e}"
                )));
                false
            }
        };

        if renamed || self.leftover_backup().await {
            match self.git.rename_remote(ORIGIN_BACKUP, ORIGIN).await {
                Ok(true) => tracing::debug!("restored origin remote"),
                _ => diag.warn(Warning::link(format!(
                    "could not restore remote '{ORIGIN}' from '{ORIGIN_BACKUP}'; rename it back manually"
                ))),
            }
        }

        linked
    }

    /// A backup remote left behind by an interrupted earlier run, with no origin beside it.
    async fn leftover_backup(&self) -> bool {
        matches!(self.git.has_remote(ORIGIN_BACKUP).await, Ok(true))
            && matches!(self.git.has_remote(ORIGIN).await, Ok(false))
    }

    /// Raw `vercel project ls` output.
    pub async fn list_projects(&self) -> Result<String> {
        let command = self.vercel(["project", "ls"]);
        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(Error::Deployment(format!(
                "`{}` failed with {}",
                command.command_line(),
                output.failure_reason()
            )));
        }
        // The CLI writes its table to stderr on some versions.
        Ok(format!("{}{}", output.stdout, output.stderr))
    }

    /// Confirm `project` is listed, so git pushes will trigger deployments.
    ///
    /// A failing listing is an error; a listing without the project is a warning.
    pub async fn verify_project(
        &self,
        project: &ProjectName,
        diag: &mut Diagnostics,
    ) -> Result<bool> {
        let listing = self.list_projects().await?;
        tracing::debug!("vercel projects:\n{}", listing);

        let listed = listing
            .split_whitespace()
            .any(|word| word == project.as_str());
        if !listed {
            diag.warn(Warning::project_verification(format!(
                "project {project} not found in `vercel project ls` output"
            )));
        }
        Ok(listed)
    }

    /// Remove a hosting project by name.
    pub async fn remove_project(&self, project: &ProjectName) -> std::result::Result<bool, ExecError> {
        let output = self
            .runner
            .run(&self.vercel(["project", "rm", project.as_str(), "--yes"]))
            .await?;
        if !output.success() {
            tracing::debug!(project = %project, "project removal failed: {}", output.failure_reason());
        }
        Ok(output.success())
    }

    /// Drop the local project link directory.
    pub fn unlink(&self) -> std::io::Result<bool> {
        remove_dir_if_present(&self.workdir.join(LINK_DIR))
    }
}

/// `Ok(true)` if removed, `Ok(false)` if there was nothing to remove.
fn remove_dir_if_present(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// `Ok(true)` if removed, `Ok(false)` if there was nothing to remove.
pub(crate) fn remove_file_if_present(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

// ABOUTME: Sequences the eight deploy steps and owns the single error boundary.
// ABOUTME: Any failure, interrupt, or panic is routed through failure cleanup before returning.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use super::state::{RunState, RunTracker};
use crate::build::BuildValidator;
use crate::cleanup::CleanupCoordinator;
use crate::config::{DeployRequest, Settings};
use crate::credentials::{Credential, CredentialStore};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::git::GitController;
use crate::github::{
    EnsureAction, RemoteRepository, RepositoryHost, TokenCheck, ensure_repository_with,
};
use crate::hosting::HostingDeployer;
use crate::output::Output;
use crate::types::{BranchName, ProjectName};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub repository: RemoteRepository,
    pub action: EnsureAction,
    pub branch: BranchName,
    /// `None` when the hosting deploy was skipped.
    pub project: Option<ProjectName>,
    pub linked: bool,
    pub warnings: Vec<Warning>,
    pub history: Vec<RunState>,
}

impl DeploySummary {
    pub fn state(&self) -> RunState {
        self.history.last().copied().unwrap_or(RunState::Idle)
    }
}

/// Everything the failure path needs after the pipeline future is gone.
#[derive(Default)]
struct RunContext {
    tracker: RunTracker,
    credential: Option<Credential>,
    diag: Diagnostics,
}

/// Runs a deploy from token validation through cleanup.
pub struct Orchestrator {
    store: CredentialStore,
    host: Arc<dyn RepositoryHost>,
    git: GitController,
    build: BuildValidator,
    hosting: HostingDeployer,
    cleanup: CleanupCoordinator,
    output: Output,
}

impl Orchestrator {
    pub fn new(
        settings: &Settings,
        store: CredentialStore,
        host: Arc<dyn RepositoryHost>,
        runner: Arc<dyn CommandRunner>,
        workdir: impl Into<PathBuf>,
        output: Output,
    ) -> Self {
        let workdir = workdir.into();
        let git = GitController::new(runner.clone(), &workdir)
            .env_branch(settings.env_branch.clone())
            .ssh_host(settings.ssh_host.clone());
        let build = BuildValidator::new(runner.clone(), &workdir)
            .package_manager(&settings.package_manager)
            .script(&settings.build_script);
        let hosting = HostingDeployer::new(runner, git.clone()).builder(&settings.hosting_builder);
        let cleanup = CleanupCoordinator::new(host.clone(), git.clone(), hosting.clone());

        Self {
            store,
            host,
            git,
            build,
            hosting,
            cleanup,
            output,
        }
    }

    /// Run the full pipeline with no external interrupt.
    pub async fn run(&mut self, request: &DeployRequest) -> Result<DeploySummary> {
        self.run_until(request, std::future::pending()).await
    }

    /// Run the full pipeline, treating completion of `interrupt` as a failure.
    ///
    /// On any error the run is marked failed and everything it created is removed
    /// before the error is returned.
    pub async fn run_until<F>(&mut self, request: &DeployRequest, interrupt: F) -> Result<DeploySummary>
    where
        F: Future<Output = ()>,
    {
        self.output.start_timer();
        let mut ctx = RunContext::default();

        let outcome = {
            let pipeline = AssertUnwindSafe(self.pipeline(request, &mut ctx)).catch_unwind();
            tokio::select! {
                result = pipeline => match result {
                    Ok(result) => result,
                    Err(panic) => Err(Error::Unexpected(panic_message(&*panic))),
                },
                () = interrupt => Err(Error::Interrupted),
            }
        };

        match outcome {
            Ok(summary) => {
                self.report(&summary);
                Ok(summary)
            }
            Err(err) => {
                tracing::debug!(state = %ctx.tracker.state(), "pipeline failed: {}", err);
                self.output.failed(&format!(
                    "Deployment failed after reaching stage '{}'",
                    ctx.tracker.state()
                ));
                ctx.tracker.fail();

                let record = ctx.tracker.cleanup_record();
                let report = self
                    .cleanup
                    .on_failure(
                        ctx.credential.as_ref(),
                        &request.repo,
                        &record,
                        &self.output,
                        &mut ctx.diag,
                    )
                    .await;
                if report.all_succeeded() {
                    self.output.done("Cleanup complete");
                }
                self.emit_warnings(&ctx.diag);
                Err(err)
            }
        }
    }

    async fn pipeline(&self, request: &DeployRequest, ctx: &mut RunContext) -> Result<DeploySummary> {
        // Step 1
        self.output.step(1, "Validate GitHub Token");
        let credential = self.authenticate(request, &mut ctx.diag).await?;
        ctx.credential = Some(credential.clone());
        ctx.tracker.advance(RunState::TokenValidated)?;

        // Step 2
        self.output.step(2, "Ensure GitHub Repository");
        let tracker = &mut ctx.tracker;
        let ensured = ensure_repository_with(
            self.host.as_ref(),
            &credential,
            &request.new_repository(),
            request.force_recreate,
            || tracker.repository_requested(),
        )
        .await?;
        let repository = ensured.repository.clone();
        let action = ensured.action;
        ctx.tracker.repository_ensured(ensured)?;
        self.output.done(&match action {
            EnsureAction::Created => format!("Created repository {}", repository.full_name()),
            EnsureAction::Reused => format!("Using existing repository {}", repository.full_name()),
            EnsureAction::Recreated => format!("Recreated repository {}", repository.full_name()),
        });

        // Step 3
        self.output.step(3, "Push Source Code");
        let branch = self
            .git
            .push(&repository.clone_url, &request.repo, request.branch.as_deref())
            .await?;
        ctx.tracker.advance(RunState::CodePushed)?;
        self.output.done(&format!("Pushed to branch {branch}"));

        // Step 4
        self.output.step(4, "Validate Build");
        if request.runs_build_validation() {
            self.build.validate().await?;
            ctx.tracker.advance(RunState::BuildValidated)?;
            self.output.done("Build succeeded");
        } else {
            self.output.progress("Skipped");
        }

        // Step 5
        self.output.step(5, "Pre-deployment Cleanup");
        if request.skip_hosting_deploy {
            self.output.progress("Skipped");
        } else {
            match self.hosting.prepare() {
                Ok(true) => self.output.done("Removed stale project link"),
                Ok(false) => self.output.done("Nothing to clean"),
                Err(e) => ctx.diag.warn(Warning::cleanup(format!(
                    "could not remove stale project link: {e}"
                ))),
            }
        }

        // Step 6
        self.output.step(6, "Deploy to Vercel");
        let mut project = None;
        let mut linked = false;
        if request.skip_hosting_deploy {
            self.output.progress("Skipped");
        } else {
            let written = self
                .hosting
                .write_manifest()
                .map_err(|e| Error::Deployment(format!("could not write vercel.json: {e}")))?;
            if written {
                ctx.tracker.manifest_written();
                self.output.progress("Wrote vercel.json");
            }

            let name = self.hosting.new_project(&request.repo);
            ctx.tracker.deployment_issued(name.clone());
            self.output.progress(&format!("Deploying as project {name}..."));
            self.hosting.deploy(&name).await?;
            ctx.tracker.advance(RunState::Deployed)?;
            self.output.done(&format!("Deployed project {name}"));

            linked = self.hosting.link(&mut ctx.diag).await;
            if linked {
                self.output.done("Linked project to the GitHub repository");
            }
            project = Some(name);
        }

        // Step 7
        self.output.step(7, "Verify Continuous Deployment");
        match &project {
            Some(name) => {
                if self.hosting.verify_project(name, &mut ctx.diag).await? {
                    self.output.done("Pushes will trigger new deployments");
                }
                ctx.tracker.advance(RunState::WebhookConfigured)?;
            }
            None => self.output.progress("Skipped"),
        }

        // Step 8
        self.output.step(8, "Cleanup");
        let record = ctx.tracker.cleanup_record();
        self.cleanup
            .post_success(&request.repo, &record, &self.output, &mut ctx.diag)
            .await;
        ctx.tracker.advance(RunState::CleanedUp)?;

        Ok(DeploySummary {
            repository,
            action,
            branch,
            project,
            linked,
            warnings: ctx.diag.warnings().to_vec(),
            history: ctx.tracker.history().to_vec(),
        })
    }

    /// Pick the token, check it against GitHub, and persist it if it came from the command line.
    async fn authenticate(&self, request: &DeployRequest, diag: &mut Diagnostics) -> Result<Credential> {
        let (credential, supplied) = match &request.token {
            Some(token) if !token.is_empty() => (token.clone(), true),
            _ => match self.store.load() {
                Some(saved) => {
                    if let Some(path) = saved.location() {
                        tracing::debug!(path = %path.display(), "using saved token");
                    }
                    (saved, false)
                }
                None => return Err(Error::MissingToken),
            },
        };

        let check = self
            .host
            .validate_token(&credential)
            .await
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        let identity = match check {
            TokenCheck::Valid(identity) => identity,
            TokenCheck::Invalid(message) => return Err(Error::InvalidToken(message)),
        };
        tracing::info!(login = %identity.login, "token validated");
        self.output.done(&format!("Authenticated as {}", identity.login));

        if !supplied {
            return Ok(credential);
        }
        if self.store.save(&credential) {
            return Ok(credential.with_location(self.store.path()));
        }
        diag.warn(Warning::credential_save(format!(
            "could not save token to {}; pass --token again next time",
            self.store.path().display()
        )));
        Ok(credential)
    }

    fn report(&self, summary: &DeploySummary) {
        self.emit_warnings_from(&summary.warnings);
        self.output.success("Deployment complete!");
        self.output
            .progress(&format!("Repository: {}", summary.repository.html_url));
        self.output
            .progress(&format!("Clone URL:  {}", summary.repository.clone_url));
        self.output.progress(&format!("Branch:     {}", summary.branch));
        if let Some(project) = &summary.project {
            self.output.progress(&format!("Vercel:     {project}"));
        }
    }

    fn emit_warnings(&self, diag: &Diagnostics) {
        self.emit_warnings_from(diag.warnings());
    }

    fn emit_warnings_from(&self, warnings: &[Warning]) {
        for warning in warnings {
            self.output.warning(&warning.message);
        }
    }
}

/// Resolves when the user presses Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!("could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with a non-string payload".to_string())
}

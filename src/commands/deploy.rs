// ABOUTME: Deploy command implementation.
// ABOUTME: Wires the real GitHub client and subprocess runner into the orchestrator.

use hoist::config::{DeployRequest, Settings};
use hoist::deploy::{Orchestrator, ctrl_c};
use hoist::error::Result;
use hoist::exec::SystemRunner;
use hoist::github::GitHubClient;
use hoist::output::Output;
use std::env;
use std::sync::Arc;

/// Deploy the current directory. Ctrl-C triggers failure cleanup.
pub async fn deploy(request: DeployRequest, settings: Settings, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let store = settings.credential_store()?;
    let host = Arc::new(GitHubClient::new(&settings.api_url, settings.http_timeout)?);
    let runner = Arc::new(SystemRunner::new(settings.command_timeout));

    tracing::debug!(
        repo = %request.repo,
        workdir = %cwd.display(),
        api = %settings.api_url,
        "starting deploy"
    );

    let mut orchestrator = Orchestrator::new(&settings, store, host, runner, cwd, output);
    orchestrator.run_until(&request, ctrl_c()).await?;
    Ok(())
}

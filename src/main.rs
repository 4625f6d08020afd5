// ABOUTME: Entry point for the hoist CLI application.
// ABOUTME: Parses arguments, sets up logging, and dispatches to the command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use hoist::config::{DeployRequest, Settings, Visibility};
use hoist::credentials::Credential;
use hoist::error::Result;
use hoist::output::Output;
use hoist::types::RepoName;
use std::env;
use tracing_subscriber::EnvFilter;

/// Overrides the --verbose level when set.
const LOG_ENV: &str = "HOIST_LOG";

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());
    let result = run(cli, output).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    if cli.delete_token {
        let settings = Settings::resolve(cli.config.as_deref(), &cwd)?.with_env()?;
        return commands::delete_token(&settings, &output);
    }

    // Name problems are reported before any config, network, or subprocess work.
    let repo = RepoName::new(cli.repository.as_deref().unwrap_or_default())?;
    let settings = Settings::resolve(cli.config.as_deref(), &cwd)?.with_env()?;

    let request = DeployRequest {
        repo,
        description: cli.description,
        visibility: if cli.public {
            Visibility::Public
        } else {
            Visibility::Private
        },
        branch: cli.branch,
        token: cli.token.map(Credential::new),
        force_recreate: cli.force,
        skip_build_validation: cli.skip_build_validation,
        skip_hosting_deploy: cli.skip_vercel,
        verbose: cli.verbose,
    };

    commands::deploy(request, settings, output).await
}

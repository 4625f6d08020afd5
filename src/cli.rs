// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One deploy command with flags; --delete-token is a standalone action.

use clap::Parser;
use std::path::PathBuf;

use hoist::output::OutputMode;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Create a GitHub repository, push this checkout, and deploy it to Vercel")]
#[command(version)]
pub struct Cli {
    /// Name of the GitHub repository to create or reuse
    #[arg(required_unless_present = "delete_token")]
    pub repository: Option<String>,

    /// Repository description
    #[arg(short, long)]
    pub description: Option<String>,

    /// GitHub personal access token (saved for later runs once validated)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Branch to push (default: $DEPLOYMENT_BRANCH, then derived from the repository name)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Create the repository as public
    #[arg(long)]
    pub public: bool,

    /// Delete and recreate the repository if it already exists
    #[arg(long)]
    pub force: bool,

    /// Do not run the npm build before deploying
    #[arg(long)]
    pub skip_build_validation: bool,

    /// Push to GitHub only; no Vercel deployment
    #[arg(long, alias = "skip-hosting-deploy")]
    pub skip_vercel: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Delete the saved GitHub token and exit
    #[arg(long)]
    pub delete_token: bool,

    /// Minimal output for CI
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    pub json: bool,

    /// Load settings from this file instead of discovering hoist.yml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

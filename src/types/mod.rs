// ABOUTME: Validated domain types shared across the deploy pipeline.
// ABOUTME: Repository, branch, and hosting project names are checked once at construction.

mod branch_name;
mod project_name;
mod repo_name;

pub use branch_name::{BranchName, BranchNameError};
pub use project_name::ProjectName;
pub use repo_name::{RepoName, RepoNameError};

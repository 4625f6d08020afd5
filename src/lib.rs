// ABOUTME: Library root for hoist - exposes the pipeline components for the binary and tests.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod cleanup;
pub mod config;
pub mod credentials;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod git;
pub mod github;
pub mod hosting;
pub mod output;
pub mod types;

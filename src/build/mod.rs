// ABOUTME: Pre-deploy build validation against the project's package.json.
// ABOUTME: A missing manifest, missing build script, or failing build is a validation failure.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::exec::{CommandRunner, CommandSpec, ExecError};

pub const MANIFEST_FILENAME: &str = "package.json";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{} not found", .0.display())]
    ManifestMissing(PathBuf),

    #[error("could not parse {}: {reason}", path.display())]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("no \"{0}\" script found in package.json")]
    ScriptMissing(String),

    #[error("`{command}` failed with {reason}")]
    Failed { command: String, reason: String },

    #[error(transparent)]
    Exec(#[from] ExecError),
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    scripts: HashMap<String, String>,
}

/// Runs the project's build before anything is shipped.
#[derive(Clone)]
pub struct BuildValidator {
    runner: Arc<dyn CommandRunner>,
    workdir: PathBuf,
    package_manager: String,
    script: String,
}

impl BuildValidator {
    pub fn new(runner: Arc<dyn CommandRunner>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
            package_manager: "npm".to_string(),
            script: "build".to_string(),
        }
    }

    /// Use a different package manager binary (`pnpm`, `yarn`, ...).
    pub fn package_manager(mut self, binary: impl Into<String>) -> Self {
        self.package_manager = binary.into();
        self
    }

    /// Use a different script name from `package.json`.
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// The command that `validate` runs.
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.package_manager, ["run", self.script.as_str()])
            .current_dir(&self.workdir)
            .inherit_stdio()
    }

    /// Check the manifest, then run the build. Build output streams to the terminal.
    pub async fn validate(&self) -> Result<(), BuildError> {
        self.check_manifest()?;

        let command = self.command();
        tracing::info!(command = %command, "running build validation");
        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(BuildError::Failed {
                command: command.command_line(),
                reason: output.failure_reason(),
            });
        }

        Ok(())
    }

    fn check_manifest(&self) -> Result<(), BuildError> {
        let path = self.workdir.join(MANIFEST_FILENAME);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BuildError::ManifestMissing(path));
            }
            Err(e) => {
                return Err(BuildError::ManifestInvalid {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        let manifest: PackageManifest =
            serde_json::from_str(&contents).map_err(|e| BuildError::ManifestInvalid {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        match manifest.scripts.get(&self.script) {
            Some(script) if !script.trim().is_empty() => Ok(()),
            _ => Err(BuildError::ScriptMissing(self.script.clone())),
        }
    }
}

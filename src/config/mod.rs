// ABOUTME: Settings for hoist: optional hoist.yml in the project plus environment overrides.
// ABOUTME: Also holds the per-run DeployRequest built from the command line.

mod request;

pub use request::{DeployRequest, Visibility};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::github::DEFAULT_API_URL;

pub const CONFIG_FILENAME: &str = "hoist.yml";
pub const CONFIG_FILENAME_ALT: &str = "hoist.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".hoist/config.yml";

/// Branch override consulted when no `--branch` is given.
pub const ENV_BRANCH: &str = "DEPLOYMENT_BRANCH";
pub const ENV_API_URL: &str = "HOIST_API_URL";
pub const ENV_TOKEN_FILE: &str = "HOIST_TOKEN_FILE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// GitHub REST API base URL.
    pub api_url: String,

    /// Host used in the generated SSH push remote instead of the clone URL's host.
    pub ssh_host: Option<String>,

    #[serde(with = "humantime_serde")]
    pub http_timeout: Duration,

    /// Deadline for each git/npm/vercel invocation.
    #[serde(with = "humantime_serde")]
    pub command_timeout: Duration,

    pub package_manager: String,

    pub build_script: String,

    /// Builder written into a generated vercel.json.
    pub hosting_builder: String,

    pub token_file: Option<PathBuf>,

    /// From `DEPLOYMENT_BRANCH`; never read from the file.
    #[serde(skip)]
    pub env_branch: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: DEFAULT_API_URL.to_string(),
            ssh_host: None,
            http_timeout: default_http_timeout(),
            command_timeout: default_command_timeout(),
            package_manager: "npm".to_string(),
            build_script: "build".to_string(),
            hosting_builder: "@vercel/next".to_string(),
            token_file: None,
            env_branch: None,
        }
    }
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(15 * 60)
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults if there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => Self::load(&path),
            None => Ok(Settings::default()),
        }
    }

    /// Load `explicit` if given (it must exist), otherwise discover in `dir`.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(Error::ConfigNotFound(path.to_path_buf())),
            Some(path) => Self::load(path),
            None => Self::discover(dir),
        }
    }

    /// Path of the config file that `discover` would load.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Apply environment overrides on top of file values.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(url) = non_empty_env(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(path) = non_empty_env(ENV_TOKEN_FILE) {
            self.token_file = Some(PathBuf::from(path));
        }
        self.env_branch = non_empty_env(ENV_BRANCH);
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(Error::InvalidConfig(format!(
                "api_url must be an http(s) URL, got {}",
                self.api_url
            )));
        }
        if self.command_timeout.is_zero() || self.http_timeout.is_zero() {
            return Err(Error::InvalidConfig("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Token store at the configured path, or `~/.github-deploy-token`.
    pub fn credential_store(&self) -> Result<CredentialStore> {
        match &self.token_file {
            Some(path) => Ok(CredentialStore::new(path)),
            None => CredentialStore::in_home(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_yaml("").unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.command_timeout, Duration::from_secs(900));
        assert_eq!(settings.package_manager, "npm");
    }

    #[test]
    fn parses_humantime_durations() {
        let settings = Settings::from_yaml(
            "http_timeout: 10s\ncommand_timeout: 5m\nbuild_script: compile\n",
        )
        .unwrap();
        assert_eq!(settings.http_timeout, Duration::from_secs(10));
        assert_eq!(settings.command_timeout, Duration::from_secs(300));
        assert_eq!(settings.build_script, "compile");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Settings::from_yaml("servers: []\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = std::env::temp_dir();
        let missing = dir.join("hoist-no-such-config.yml");
        let err = Settings::resolve(Some(&missing), &dir).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn env_branch_is_not_a_file_key() {
        assert!(Settings::from_yaml("env_branch: main\n").is_err());
    }
}

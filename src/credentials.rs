// ABOUTME: Persistence for the single GitHub access token this tool manages.
// ABOUTME: Token lives in a plain-text per-user file and is wrapped in a SecretString in memory.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default token file name, relative to the user's home directory.
pub const TOKEN_FILENAME: &str = ".github-deploy-token";

/// A bearer token for the source host, plus the file it was loaded from or saved to.
///
/// `Debug` and `Display` never print the value; the only way to read it is
/// [`Credential::expose`], which callers use at the point of the HTTP request.
#[derive(Clone)]
pub struct Credential {
    token: SecretString,
    location: Option<PathBuf>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into().trim().to_string()),
            location: None,
        }
    }

    /// Attach the token file this credential is persisted in.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// `None` for a token that has only ever lived on the command line.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("location", &self.location)
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Loads, saves, and deletes the persisted token.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at `~/.github-deploy-token`.
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::InvalidConfig("cannot determine home directory".to_string()))?;
        Ok(Self::new(home.join(TOKEN_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved token.
    ///
    /// Returns `None` when there is no file, the file is blank, or it cannot be read.
    /// Read failures are warned about, never raised.
    pub fn load(&self) -> Option<Credential> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let credential = Credential::new(contents).with_location(&self.path);
                if credential.is_empty() {
                    tracing::debug!(path = %self.path.display(), "saved token file is empty");
                    None
                } else {
                    Some(credential)
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "could not load saved token: {}", e);
                None
            }
        }
    }

    /// Persist `credential`, replacing any previous value.
    ///
    /// Returns `false` (after warning) if the write fails; the caller carries on.
    pub fn save(&self, credential: &Credential) -> bool {
        match self.write(credential) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "saved GitHub token");
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to save token: {}", e);
                false
            }
        }
    }

    fn write(&self, credential: &Credential) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, credential.expose())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Remove the saved token. Returns whether a file was actually removed.
    pub fn delete(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

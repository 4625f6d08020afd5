// ABOUTME: Diagnostics accumulator for non-fatal warnings during a deploy run.
// ABOUTME: Link and cleanup failures land here instead of aborting the pipeline.

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings of one kind.
    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Linking the hosting project to the repository failed.
    pub fn link(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Link,
            message: message.into(),
        }
    }

    /// A compensating or tidy-up action failed.
    pub fn cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Cleanup,
            message: message.into(),
        }
    }

    /// The token could not be persisted.
    pub fn credential_save(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CredentialSave,
            message: message.into(),
        }
    }

    /// The deployed project did not show up in the project listing.
    pub fn project_verification(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ProjectVerification,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Continuous-deployment link could not be established.
    Link,
    /// Cleanup step failed; resources may need manual removal.
    Cleanup,
    /// Token was valid but could not be saved for later runs.
    CredentialSave,
    /// Project listing did not include the new project.
    ProjectVerification,
}

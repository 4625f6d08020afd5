// ABOUTME: Per-action outcomes collected during cleanup.
// ABOUTME: Lets callers and tests see exactly which removals succeeded.

/// Outcome of one cleanup action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    NotPresent,
    Failed(String),
}

impl From<std::io::Result<bool>> for CleanupOutcome {
    fn from(result: std::io::Result<bool>) -> Self {
        match result {
            Ok(true) => CleanupOutcome::Removed,
            Ok(false) => CleanupOutcome::NotPresent,
            Err(e) => CleanupOutcome::Failed(e.to_string()),
        }
    }
}

/// One attempted cleanup action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupAction {
    pub target: String,
    pub outcome: CleanupOutcome,
}

/// Everything a cleanup pass attempted.
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    actions: Vec<CleanupAction>,
}

impl CleanupReport {
    pub fn record(&mut self, target: impl Into<String>, outcome: CleanupOutcome) {
        self.actions.push(CleanupAction {
            target: target.into(),
            outcome,
        });
    }

    pub fn extend(&mut self, other: CleanupReport) {
        self.actions.extend(other.actions);
    }

    pub fn actions(&self) -> &[CleanupAction] {
        &self.actions
    }

    /// Outcome for the first action whose target contains `needle`.
    pub fn outcome_for(&self, needle: &str) -> Option<&CleanupOutcome> {
        self.actions
            .iter()
            .find(|a| a.target.contains(needle))
            .map(|a| &a.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CleanupAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a.outcome, CleanupOutcome::Failed(_)))
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

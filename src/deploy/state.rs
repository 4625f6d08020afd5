// ABOUTME: Run state machine for a deploy and the tracker that records what was created.
// ABOUTME: Stages only move forward; optional stages may be skipped; Failed is reachable from any live stage.

use std::fmt;
use thiserror::Error;

use crate::cleanup::CleanupRecord;
use crate::github::EnsuredRepository;
use crate::types::ProjectName;

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    TokenValidated,
    RepositoryEnsured,
    CodePushed,
    BuildValidated,
    Deployed,
    WebhookConfigured,
    CleanedUp,
    Failed,
}

const ORDER: [RunState; 8] = [
    RunState::Idle,
    RunState::TokenValidated,
    RunState::RepositoryEnsured,
    RunState::CodePushed,
    RunState::BuildValidated,
    RunState::Deployed,
    RunState::WebhookConfigured,
    RunState::CleanedUp,
];

impl RunState {
    fn position(self) -> Option<usize> {
        ORDER.iter().position(|s| *s == self)
    }

    /// `CleanedUp` and `Failed` end a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::CleanedUp | RunState::Failed)
    }

    /// Stages a run may pass over: build validation and hosting are switchable.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            RunState::BuildValidated | RunState::Deployed | RunState::WebhookConfigured
        )
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: RunState) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == RunState::Failed {
            return true;
        }

        match (self.position(), next.position()) {
            (Some(from), Some(to)) if to > from => {
                ORDER[from + 1..to].iter().all(|skipped| skipped.is_optional())
            }
            _ => false,
        }
    }

    pub fn transition(self, next: RunState) -> Result<RunState, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::TokenValidated => "token validated",
            RunState::RepositoryEnsured => "repository ensured",
            RunState::CodePushed => "code pushed",
            RunState::BuildValidated => "build validated",
            RunState::Deployed => "deployed",
            RunState::WebhookConfigured => "webhook configured",
            RunState::CleanedUp => "cleaned up",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: RunState,
    pub to: RunState,
}

/// Current stage plus the facts cleanup needs about what this run created.
#[derive(Debug, Clone)]
pub struct RunTracker {
    state: RunState,
    history: Vec<RunState>,
    repository: Option<EnsuredRepository>,
    creation_requested: bool,
    hosting_project: Option<ProjectName>,
    manifest_created: bool,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            history: vec![RunState::Idle],
            repository: None,
            creation_requested: false,
            hosting_project: None,
            manifest_created: false,
        }
    }
}

impl RunTracker {
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every stage entered so far, starting with `Idle`.
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    /// Whether the run has been through `stage`.
    pub fn reached(&self, stage: RunState) -> bool {
        self.history.contains(&stage)
    }

    /// Record that `next` has been reached. Call only after its side effect succeeded.
    pub fn advance(&mut self, next: RunState) -> Result<(), TransitionError> {
        self.state = self.state.transition(next)?;
        self.history.push(next);
        Ok(())
    }

    /// Record the repository and enter `RepositoryEnsured`.
    pub fn repository_ensured(&mut self, repo: EnsuredRepository) -> Result<(), TransitionError> {
        self.advance(RunState::RepositoryEnsured)?;
        self.repository = Some(repo);
        Ok(())
    }

    /// Note that a create request for the repository is about to be sent.
    ///
    /// From here on the repository counts as ours, even if the request never
    /// completes.
    pub fn repository_requested(&mut self) {
        self.creation_requested = true;
    }

    pub fn repository(&self) -> Option<&EnsuredRepository> {
        self.repository.as_ref()
    }

    /// Note that a deployment is about to be issued under `project`.
    ///
    /// Recorded before the CLI call so a deploy that fails halfway still has
    /// its project removed.
    pub fn deployment_issued(&mut self, project: ProjectName) {
        self.hosting_project = Some(project);
    }

    pub fn hosting_project(&self) -> Option<&ProjectName> {
        self.hosting_project.as_ref()
    }

    pub fn manifest_written(&mut self) {
        self.manifest_created = true;
    }

    /// Enter `Failed`. Idempotent once failed.
    pub fn fail(&mut self) {
        if self.state != RunState::Failed && self.state.can_transition_to(RunState::Failed) {
            self.state = RunState::Failed;
            self.history.push(RunState::Failed);
        }
    }

    /// What cleanup is allowed to remove.
    pub fn cleanup_record(&self) -> CleanupRecord {
        CleanupRecord {
            repository_created: self.creation_requested
                || (self.reached(RunState::RepositoryEnsured)
                    && self.repository.as_ref().is_some_and(EnsuredRepository::created)),
            hosting_project: self.hosting_project.clone(),
            manifest_created: self.manifest_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_steps_are_legal() {
        assert!(RunState::Idle.can_transition_to(RunState::TokenValidated));
        assert!(RunState::CodePushed.can_transition_to(RunState::BuildValidated));
    }

    #[test]
    fn optional_stages_can_be_skipped() {
        assert!(RunState::CodePushed.can_transition_to(RunState::Deployed));
        assert!(RunState::CodePushed.can_transition_to(RunState::CleanedUp));
    }

    #[test]
    fn mandatory_stages_cannot_be_skipped() {
        assert!(!RunState::Idle.can_transition_to(RunState::CodePushed));
        assert!(!RunState::TokenValidated.can_transition_to(RunState::CodePushed));
    }

    #[test]
    fn no_backward_moves() {
        assert!(!RunState::Deployed.can_transition_to(RunState::CodePushed));
        assert!(!RunState::CodePushed.can_transition_to(RunState::CodePushed));
        assert!(!RunState::TokenValidated.can_transition_to(RunState::Idle));
    }

    #[test]
    fn failed_reachable_from_live_stages_only() {
        assert!(RunState::Idle.can_transition_to(RunState::Failed));
        assert!(RunState::WebhookConfigured.can_transition_to(RunState::Failed));
        assert!(!RunState::CleanedUp.can_transition_to(RunState::Failed));
        assert!(!RunState::Failed.can_transition_to(RunState::Idle));
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = RunState::Deployed.transition(RunState::Idle).unwrap_err();
        assert_eq!(err.to_string(), "cannot move from deployed to idle");
    }

    #[test]
    fn fresh_tracker_has_nothing_to_clean() {
        let tracker = RunTracker::default();
        assert_eq!(tracker.cleanup_record(), CleanupRecord::default());
    }

    #[test]
    fn requested_repository_is_owned_before_it_is_ensured() {
        let mut tracker = RunTracker::default();
        tracker.advance(RunState::TokenValidated).unwrap();
        tracker.repository_requested();
        tracker.fail();
        assert!(tracker.cleanup_record().repository_created);
        assert!(tracker.repository().is_none());
    }

    #[test]
    fn tracker_fail_is_idempotent() {
        let mut tracker = RunTracker::default();
        tracker.advance(RunState::TokenValidated).unwrap();
        tracker.fail();
        tracker.fail();
        assert_eq!(tracker.state(), RunState::Failed);
        assert_eq!(
            tracker.history(),
            &[RunState::Idle, RunState::TokenValidated, RunState::Failed]
        );
    }
}

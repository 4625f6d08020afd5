// ABOUTME: Deploy orchestration: the run state machine and the pipeline that drives it.
// ABOUTME: Exports the Orchestrator plus the state types callers and tests inspect.

mod orchestrator;
mod state;

pub use orchestrator::{DeploySummary, Orchestrator, ctrl_c};
pub use state::{RunState, RunTracker, TransitionError};

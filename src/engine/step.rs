//! Step contract - the unit of pipeline work
//!
//! A step is a named unit of work the runner drives through two operations:
//! `run`, which may inspect and mutate the shared state bag and returns a
//! control signal, and `cleanup`, a best-effort rollback the runner invokes
//! in reverse order once any step halts or the run is cancelled.

use async_trait::async_trait;
use uuid::Uuid;

use crate::engine::cancel::CancellationToken;
use crate::engine::state_bag::{keys, StateBag};

/// Control signal a step returns to the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Proceed to the next step
    Continue,
    /// Stop the run; the runner cleans up executed steps in reverse order
    Halt,
}

/// Per-run execution context handed to every step
#[derive(Debug, Clone)]
pub struct StepContext {
    run_id: Uuid,
    cancel: CancellationToken,
}

impl StepContext {
    pub fn new(run_id: Uuid, cancel: CancellationToken) -> Self {
        Self { run_id, cancel }
    }

    /// Identifier of the pipeline run this step executes in
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Token steps race long-running calls against
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the run has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Default for StepContext {
    fn default() -> Self {
        Self::new(Uuid::new_v4(), CancellationToken::new())
    }
}

/// A unit of pipeline work with run and cleanup phases.
///
/// Steps never run concurrently within one pipeline execution; the runner
/// drives them strictly in registration order, so `run` holds exclusive
/// access to the state bag for its whole duration.
#[async_trait]
pub trait Step: Send + Sync {
    /// Human-readable step name, used in runner logs
    fn name(&self) -> &str;

    /// Execute the step's work against the shared state bag
    async fn run(&self, ctx: &StepContext, state: &mut StateBag) -> StepAction;

    /// Best-effort rollback; default is a no-op for irreversible steps
    async fn cleanup(&self, state: &mut StateBag) {
        let _ = state;
    }
}

/// Map a step's internal result to a control signal.
///
/// On failure the error text is recorded in the state bag under
/// [`keys::ERROR`] so the runner can surface it in the run outcome.
pub fn process_step_result<E: std::error::Error>(
    result: Result<(), E>,
    state: &mut StateBag,
) -> StepAction {
    match result {
        Ok(()) => StepAction::Continue,
        Err(err) => {
            state.put(keys::ERROR, err.to_string());
            StepAction::Halt
        }
    }
}

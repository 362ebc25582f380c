//! Sequential step runner
//!
//! Drives registered steps strictly in order, passing each one the shared
//! state bag. When a step halts the run or cancellation is signalled, every
//! step that started is cleaned up in reverse order before the runner
//! returns.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::engine::cancel::CancellationToken;
use crate::engine::state_bag::{keys, StateBag};
use crate::engine::step::{Step, StepAction, StepContext};

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step returned Continue
    Completed,
    /// A step returned Halt; carries its name and any recorded error text
    Halted {
        step: String,
        error: Option<String>,
    },
    /// Cancellation was signalled before all steps ran
    Cancelled,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

/// Sequential pipeline runner over an ordered list of steps
#[derive(Default)]
pub struct Runner {
    steps: Vec<Box<dyn Step>>,
}

impl Runner {
    /// Create a runner with no steps registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the execution order
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Names of the registered steps, in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Execute the registered steps against `state`.
    ///
    /// Each run gets a fresh run id; the supplied token cancels the run
    /// between steps and is forwarded to steps for in-flight calls. The
    /// state bag must be owned by exactly this run.
    pub async fn run(&self, state: &mut StateBag, cancel: CancellationToken) -> RunResult {
        let run_id = Uuid::new_v4();
        let ctx = StepContext::new(run_id, cancel.clone());
        let started_at = Utc::now();

        info!(%run_id, steps = self.steps.len(), "Starting pipeline run");

        let mut executed: Vec<&dyn Step> = Vec::with_capacity(self.steps.len());
        let mut outcome = RunOutcome::Completed;

        for step in &self.steps {
            if cancel.is_cancelled() {
                warn!(%run_id, "Run cancelled");
                outcome = RunOutcome::Cancelled;
                break;
            }

            debug!(%run_id, step = step.name(), "Running step");
            executed.push(step.as_ref());

            match step.run(&ctx, state).await {
                StepAction::Continue => {}
                StepAction::Halt => {
                    let err = state.get_string(keys::ERROR).map(str::to_string);
                    error!(%run_id, step = step.name(), error = ?err, "Step halted the run");
                    outcome = RunOutcome::Halted {
                        step: step.name().to_string(),
                        error: err,
                    };
                    break;
                }
            }
        }

        if outcome != RunOutcome::Completed {
            // Reverse order, including the step that halted.
            for step in executed.iter().rev() {
                debug!(%run_id, step = step.name(), "Cleaning up step");
                step.cleanup(state).await;
            }
        }

        info!(%run_id, outcome = ?outcome, "Pipeline run finished");

        RunResult {
            run_id,
            outcome,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("steps", &self.step_names())
            .finish()
    }
}

//! Pipeline execution engine module
//!
//! This module contains:
//! - `step` - The step contract and control-action signal
//! - `state_bag` - Shared state passed between steps
//! - `runner` - The sequential step runner with cleanup-on-halt
//! - `cancel` - Run-level cancellation token
//! - `error` - Engine error types
//! - `steps` - Step implementations

pub mod cancel;
pub mod error;
pub mod runner;
pub mod state_bag;
pub mod step;
pub mod steps;

pub use cancel::CancellationToken;
pub use error::EngineError;
pub use runner::{RunOutcome, RunResult, Runner};
pub use state_bag::{keys, StateBag};
pub use step::{process_step_result, Step, StepAction, StepContext};

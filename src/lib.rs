//! # imageforge
//!
//! Step-based orchestration for cloud VM image capture pipelines: provision
//! a machine, run steps against it in sequence through a shared state bag,
//! and capture its disk as a reusable template.
//!
//! ## Features
//!
//! - **Sequential step runner** - Steps run in order; a halt or a cancelled
//!   run triggers reverse-order cleanup of every step that started
//! - **Shared state bag** - String-keyed blackboard with typed accessors,
//!   so a broken producer/consumer wiring fails the run instead of crashing
//! - **Cancellable calls** - Steps race network calls against a run-level
//!   cancellation token
//! - **Swappable collaborators** - Compute client and message sink are
//!   traits, so steps are testable without a cloud account
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use imageforge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("build.yaml")?;
//!     let client_config = config.client.clone().expect("client settings required");
//!     let client = Arc::new(ArmComputeClient::new(client_config)?);
//!     let ui = Arc::new(TracingUi::new());
//!
//!     let mut state = StateBag::new();
//!     state.put(keys::RESOURCE_GROUP_NAME, "rg-images".to_string());
//!     state.put(keys::COMPUTE_NAME, "vm-build-01".to_string());
//!
//!     let runner = Runner::new().with_step(GeneralizeComputeStep::new(client, ui, &config));
//!
//!     let result = runner.run(&mut state, CancellationToken::new()).await;
//!     println!("Run finished: success={}", result.success());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod ui;

// Re-export main types
pub use client::{
    ArmComputeClient, ClientError, ComputeClient, ComputeClientConfig, GeneralizeResponse,
};
pub use config::{Config, ConfigError};
pub use engine::{
    keys, process_step_result, CancellationToken, EngineError, RunOutcome, RunResult, Runner,
    StateBag, Step, StepAction, StepContext,
};
pub use engine::steps::GeneralizeComputeStep;
pub use ui::{MemoryUi, TracingUi, Ui, UiLine};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{ArmComputeClient, ClientError, ComputeClient, ComputeClientConfig};
    pub use crate::config::Config;
    pub use crate::engine::steps::GeneralizeComputeStep;
    pub use crate::engine::{
        keys, CancellationToken, RunOutcome, RunResult, Runner, StateBag, Step, StepAction,
        StepContext,
    };
    pub use crate::ui::{TracingUi, Ui};
}

//! Generalize-compute step
//!
//! The last mutating action before image capture: instructs the cloud
//! provider to mark the provisioned machine as generalized, stripping
//! machine-specific identity (hostname, SIDs) so the captured disk can seed
//! new instances.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{ClientError, ComputeClient};
use crate::config::Config;
use crate::engine::error::EngineError;
use crate::engine::state_bag::{keys, StateBag};
use crate::engine::step::{process_step_result, Step, StepAction, StepContext};
use crate::ui::Ui;

/// Conditionally generalizes the machine named in the state bag.
///
/// When the build is not configured to generalize, `run` is a silent no-op.
/// Otherwise the step reads the resource group and compute names produced by
/// earlier steps, issues one generalize call, and halts the run on failure.
/// No retries; retry policy, if any, belongs to the client.
pub struct GeneralizeComputeStep {
    client: Arc<dyn ComputeClient>,
    ui: Arc<dyn Ui>,
    should_generalize: bool,
}

impl GeneralizeComputeStep {
    pub fn new(client: Arc<dyn ComputeClient>, ui: Arc<dyn Ui>, config: &Config) -> Self {
        Self {
            client,
            ui,
            should_generalize: config.generalize,
        }
    }

    /// Read a target identifier an upstream step must have produced.
    ///
    /// An absent, ill-typed, or empty value means the pipeline wiring is
    /// broken; the caller aborts rather than generalize an undefined target.
    fn require_target(&self, state: &StateBag, key: &str) -> Result<String, EngineError> {
        let value = state.require_string(key)?;
        if value.is_empty() {
            return Err(EngineError::StepFailed(format!(
                "state bag key '{}' is empty",
                key
            )));
        }
        Ok(value)
    }

    fn abort(&self, state: &mut StateBag, err: EngineError) -> StepAction {
        self.ui.error(&err.to_string());
        state.put(keys::ERROR, err.to_string());
        StepAction::Halt
    }

    async fn generalize_vm(
        &self,
        ctx: &StepContext,
        resource_group_name: &str,
        compute_name: &str,
    ) -> Result<(), ClientError> {
        match self
            .client
            .generalize(ctx, resource_group_name, compute_name)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                // Prefer the client's recorded diagnostic (response body)
                // over the bare error, falling back when none was captured.
                let detail = self
                    .client
                    .last_error()
                    .unwrap_or_else(|| err.to_string());
                self.ui.error(&detail);
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Step for GeneralizeComputeStep {
    fn name(&self) -> &str {
        "generalize compute"
    }

    async fn run(&self, ctx: &StepContext, state: &mut StateBag) -> StepAction {
        if !self.should_generalize {
            return StepAction::Continue;
        }

        self.ui.say("Generalizing machine ...");

        let resource_group_name = match self.require_target(state, keys::RESOURCE_GROUP_NAME) {
            Ok(value) => value,
            Err(err) => return self.abort(state, err),
        };
        let compute_name = match self.require_target(state, keys::COMPUTE_NAME) {
            Ok(value) => value,
            Err(err) => return self.abort(state, err),
        };

        self.ui
            .say(&format!(" -> ResourceGroupName : '{}'", resource_group_name));
        self.ui
            .say(&format!(" -> ComputeName       : '{}'", compute_name));

        let result = self
            .generalize_vm(ctx, &resource_group_name, &compute_name)
            .await;

        process_step_result(result, state)
    }

    // Generalization is irreversible; nothing to roll back.
    async fn cleanup(&self, _state: &mut StateBag) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GeneralizeResponse;
    use crate::ui::MemoryUi;
    use std::sync::Mutex;

    struct StubClient {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubClient {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ComputeClient for StubClient {
        async fn generalize(
            &self,
            _ctx: &StepContext,
            resource_group_name: &str,
            compute_name: &str,
        ) -> Result<GeneralizeResponse, ClientError> {
            self.calls
                .lock()
                .unwrap()
                .push((resource_group_name.to_string(), compute_name.to_string()));
            Ok(GeneralizeResponse::default())
        }

        fn last_error(&self) -> Option<String> {
            None
        }
    }

    fn generalize_config() -> Config {
        Config {
            generalize: true,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_skip_when_not_configured() {
        let client = Arc::new(StubClient::new());
        let ui = Arc::new(MemoryUi::new());
        let step = GeneralizeComputeStep::new(client.clone(), ui.clone(), &Config::default());

        let mut state = StateBag::new();
        let action = step.run(&StepContext::default(), &mut state).await;

        assert_eq!(action, StepAction::Continue);
        assert!(ui.is_empty());
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_resource_group_halts() {
        let client = Arc::new(StubClient::new());
        let ui = Arc::new(MemoryUi::new());
        let step = GeneralizeComputeStep::new(client.clone(), ui.clone(), &generalize_config());

        let mut state = StateBag::new();
        state.put(keys::COMPUTE_NAME, "vm-01".to_string());

        let action = step.run(&StepContext::default(), &mut state).await;

        assert_eq!(action, StepAction::Halt);
        assert!(state.contains(keys::ERROR));
        assert_eq!(ui.error_lines().len(), 1);
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_compute_name_halts() {
        let client = Arc::new(StubClient::new());
        let ui = Arc::new(MemoryUi::new());
        let step = GeneralizeComputeStep::new(client.clone(), ui.clone(), &generalize_config());

        let mut state = StateBag::new();
        state.put(keys::RESOURCE_GROUP_NAME, "rg-images".to_string());
        state.put(keys::COMPUTE_NAME, String::new());

        let action = step.run(&StepContext::default(), &mut state).await;

        assert_eq!(action, StepAction::Halt);
        assert!(client.calls.lock().unwrap().is_empty());
    }
}

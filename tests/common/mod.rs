#![allow(dead_code)]

use std::sync::{Mutex, Once};

use async_trait::async_trait;
use imageforge::{ClientError, ComputeClient, Config, GeneralizeResponse, StepContext};

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once; respects RUST_LOG.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn generalize_config() -> Config {
    Config {
        generalize: true,
        ..Config::default()
    }
}

/// Scripted failure for [`StubComputeClient`]
pub struct StubFailure {
    pub status: u16,
    pub message: String,
    /// Diagnostic the client records for `last_error`, if any
    pub diagnostic: Option<String>,
}

/// Compute client double that records call arguments and optionally fails
pub struct StubComputeClient {
    calls: Mutex<Vec<(String, String)>>,
    failure: Option<StubFailure>,
}

impl StubComputeClient {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(failure: StubFailure) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    /// Recorded `(resource_group_name, compute_name)` argument pairs
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComputeClient for StubComputeClient {
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

        match &self.failure {
            None => Ok(GeneralizeResponse::default()),
            Some(failure) => Err(ClientError::Http {
                status: failure.status,
                message: failure.message.clone(),
            }),
        }
    }

    fn last_error(&self) -> Option<String> {
        self.failure.as_ref().and_then(|f| f.diagnostic.clone())
    }
}

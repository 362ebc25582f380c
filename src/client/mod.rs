//! Compute API client module
//!
//! Steps talk to the cloud provider through the [`ComputeClient`] trait so
//! they can be exercised with fakes. The `rest` submodule provides the
//! production implementation over the provider's resource-manager REST API.

use async_trait::async_trait;
use serde_json::Value;

use crate::engine::StepContext;

pub mod rest;

pub use rest::{ArmComputeClient, ComputeClientConfig};

/// Common error type for compute API operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid client configuration: {0}")]
    ConfigError(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Response from a generalize call
#[derive(Debug, Clone, Default)]
pub struct GeneralizeResponse {
    pub status: u16,
    pub body: Value,
}

/// Client for compute operations against the cloud provider.
///
/// Retry and authentication policy live behind this trait; callers issue a
/// single logical operation and surface whatever error comes back.
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// Mark the named virtual machine as generalized.
    ///
    /// Honors the step context's cancellation token: an in-flight call
    /// returns [`ClientError::Cancelled`] promptly once the run is aborted.
    async fn generalize(
        &self,
        ctx: &StepContext,
        resource_group_name: &str,
        compute_name: &str,
    ) -> Result<GeneralizeResponse, ClientError>;

    /// Richest diagnostic recorded for the most recent failed call, e.g.
    /// the raw response body. Distinct from the error a call returns;
    /// `None` when the last call succeeded or nothing was recorded.
    fn last_error(&self) -> Option<String>;
}

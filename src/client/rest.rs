//! REST implementation of the compute client
//!
//! Issues generalize calls against the provider's resource-manager endpoint
//! using reqwest. Failed calls record their response body in the `last_error`
//! diagnostic slot so operators see more than the status line.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{ClientError, ComputeClient, GeneralizeResponse};
use crate::engine::StepContext;

fn default_api_version() -> String {
    "2024-07-01".to_string()
}

fn default_timeout() -> u64 {
    60_000
}

/// Configuration for [`ArmComputeClient`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeClientConfig {
    /// Resource-manager endpoint, e.g. `https://management.azure.com`
    pub endpoint: String,

    /// Subscription the target machines live under
    pub subscription_id: String,

    /// Bearer token for the resource-manager API
    pub access_token: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Compute client backed by the resource-manager REST API
#[derive(Debug)]
pub struct ArmComputeClient {
    config: ComputeClientConfig,
    client: reqwest::Client,
    last_error: Mutex<Option<String>>,
}

impl ArmComputeClient {
    pub fn new(config: ComputeClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout))
            .build()
            .map_err(|e| ClientError::ConfigError(e.to_string()))?;

        Ok(Self {
            config,
            client,
            last_error: Mutex::new(None),
        })
    }

    fn generalize_url(&self, resource_group_name: &str, compute_name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/{}/generalize",
            self.config.endpoint.trim_end_matches('/'),
            self.config.subscription_id,
            resource_group_name,
            compute_name,
        )
    }

    fn record_last_error(&self, detail: Option<String>) {
        let mut slot = self
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = detail;
    }
}

#[async_trait]
impl ComputeClient for ArmComputeClient {
    async fn generalize(
        &self,
        ctx: &StepContext,
        resource_group_name: &str,
        compute_name: &str,
    ) -> Result<GeneralizeResponse, ClientError> {
        let url = self.generalize_url(resource_group_name, compute_name);
        debug!(%url, "Issuing generalize request");

        let request = self
            .client
            .post(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .bearer_auth(&self.config.access_token)
            .header("Content-Length", "0")
            .send();

        let response = tokio::select! {
            _ = ctx.cancel_token().cancelled() => return Err(ClientError::Cancelled),
            result = request => result?,
        };

        let status = response.status();
        if status.is_success() {
            self.record_last_error(None);
            // Generalize returns an empty body on success.
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            Ok(GeneralizeResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            let message = response.text().await.unwrap_or_default();
            self.record_last_error(Some(format!(
                "generalize returned status {}: {}",
                status.as_u16(),
                message
            )));
            Err(ClientError::Http {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ComputeClientConfig {
        ComputeClientConfig {
            endpoint: "https://management.example.com/".to_string(),
            subscription_id: "sub-123".to_string(),
            access_token: "token".to_string(),
            api_version: default_api_version(),
            timeout: default_timeout(),
        }
    }

    #[test]
    fn test_generalize_url() {
        let client = ArmComputeClient::new(test_config()).unwrap();

        assert_eq!(
            client.generalize_url("rg-images", "vm-01"),
            "https://management.example.com/subscriptions/sub-123/resourceGroups/rg-images\
             /providers/Microsoft.Compute/virtualMachines/vm-01/generalize"
        );
    }

    #[test]
    fn test_last_error_starts_empty() {
        let client = ArmComputeClient::new(test_config()).unwrap();
        assert!(client.last_error().is_none());
    }

    #[test]
    fn test_config_defaults_from_yaml() {
        let config: ComputeClientConfig = serde_yaml::from_str(
            r#"
endpoint: "https://management.example.com"
subscription_id: "sub-123"
access_token: "token"
"#,
        )
        .unwrap();

        assert_eq!(config.api_version, "2024-07-01");
        assert_eq!(config.timeout, 60_000);
    }
}

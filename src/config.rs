//! Build configuration
//!
//! Immutable values decided before a run starts, loaded from YAML:
//!
//! ```yaml
//! generalize: true
//! client:
//!   endpoint: "https://management.azure.com"
//!   subscription_id: "00000000-0000-0000-0000-000000000000"
//!   access_token: "..."
//! ```
//!
//! Steps copy the values they need at construction time and never mutate
//! the configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::client::ComputeClientConfig;

/// Errors loading the build configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Immutable configuration for one image build
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Whether to generalize the machine before capture. Off by default;
    /// when off the generalize step is a silent no-op.
    #[serde(default)]
    pub generalize: bool,

    /// Compute API client settings
    #[serde(default)]
    pub client: Option<ComputeClientConfig>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

//! Engine error types

/// Errors that can occur during pipeline execution
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Missing state bag key: {0}")]
    MissingStateKey(String),

    #[error("State bag key '{key}' has wrong type (expected {expected})")]
    WrongStateType { key: String, expected: &'static str },

    #[error("Step failed: {0}")]
    StepFailed(String),

    #[error("Run cancelled")]
    Cancelled,
}

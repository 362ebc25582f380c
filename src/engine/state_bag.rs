//! Shared state bag - the blackboard passed through a pipeline run
//!
//! Steps communicate through a string-keyed map of type-erased values. Keys
//! are pipeline-wide constants: a producing step writes a value once, and a
//! consuming step reads it after the producer has run. Each run owns its own
//! bag; the runner never shares one across concurrent runs.

use std::any::Any;
use std::collections::HashMap;

use crate::engine::error::EngineError;

/// Well-known state bag keys shared between producer and consumer steps.
pub mod keys {
    /// Name of the resource group holding the machine being imaged.
    pub const RESOURCE_GROUP_NAME: &str = "resourceGroupName";

    /// Name of the compute resource (virtual machine) being imaged.
    pub const COMPUTE_NAME: &str = "computeName";

    /// Error text recorded by a halting step, read by the runner.
    pub const ERROR: &str = "error";
}

/// String-keyed map of type-erased values shared by all steps in one run.
///
/// Reads are explicit: accessors return `Option`/`Result` instead of
/// panicking on a missing or ill-typed entry, so a broken producer/consumer
/// wiring fails the run cleanly rather than crashing the process.
#[derive(Default)]
pub struct StateBag {
    values: HashMap<String, Box<dyn Any + Send>>,
}

impl StateBag {
    /// Create an empty state bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous entry
    pub fn put<T: Any + Send>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    /// Remove the entry under `key`, if any
    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Whether an entry exists under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get a typed reference to the value under `key`.
    ///
    /// Returns `None` when the key is absent or holds a different type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Convenience accessor for string values
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get::<String>(key).map(|s| s.as_str())
    }

    /// Read a string value that an earlier step must have produced.
    ///
    /// A missing or ill-typed entry is an orchestration invariant violation,
    /// reported as an error so the run aborts instead of proceeding against
    /// an undefined target.
    pub fn require_string(&self, key: &str) -> Result<String, EngineError> {
        match self.values.get(key) {
            None => Err(EngineError::MissingStateKey(key.to_string())),
            Some(v) => v
                .downcast_ref::<String>()
                .cloned()
                .ok_or_else(|| EngineError::WrongStateType {
                    key: key.to_string(),
                    expected: "String",
                }),
        }
    }
}

impl std::fmt::Debug for StateBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        f.debug_struct("StateBag").field("keys", &keys).finish()
    }
}

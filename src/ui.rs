//! Message sink for operator-facing output
//!
//! Steps report progress and failures through the [`Ui`] trait: `say` for
//! human-readable progress lines, `error` for failure diagnostics. Calls are
//! fire-and-forget; no return value is consumed.
//!
//! [`TracingUi`] is the production sink, routing lines through `tracing`.
//! [`MemoryUi`] captures lines in order so tests can assert on exactly what
//! a step printed.

use std::sync::Mutex;

use tracing::{error, info};

/// Sink for operator-facing progress and error lines
pub trait Ui: Send + Sync {
    /// Emit a progress line
    fn say(&self, message: &str);

    /// Emit a failure diagnostic
    fn error(&self, message: &str);
}

/// Ui that routes lines through the `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingUi;

impl TracingUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for TracingUi {
    fn say(&self, message: &str) {
        info!(target: "imageforge::ui", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "imageforge::ui", "{}", message);
    }
}

/// A captured line and the channel it was emitted on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiLine {
    Say(String),
    Error(String),
}

/// Ui that records every line for later assertion
#[derive(Debug, Default)]
pub struct MemoryUi {
    lines: Mutex<Vec<UiLine>>,
}

impl MemoryUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, in emission order
    pub fn lines(&self) -> Vec<UiLine> {
        self.lock().clone()
    }

    /// Captured progress lines, in emission order
    pub fn say_lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|l| match l {
                UiLine::Say(m) => Some(m.clone()),
                UiLine::Error(_) => None,
            })
            .collect()
    }

    /// Captured error lines, in emission order
    pub fn error_lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|l| match l {
                UiLine::Error(m) => Some(m.clone()),
                UiLine::Say(_) => None,
            })
            .collect()
    }

    /// Whether nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UiLine>> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Ui for MemoryUi {
    fn say(&self, message: &str) {
        self.lock().push(UiLine::Say(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lock().push(UiLine::Error(message.to_string()));
    }
}

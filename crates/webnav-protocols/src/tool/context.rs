//! Tool execution context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Context for tool execution.
#[derive(Clone)]
pub struct ToolContext {
    /// Conversation/session the invocation belongs to.
    pub session_id: String,

    /// Correlation ID for tracing.
    pub correlation_id: String,

    /// Abort signal for cancellation.
    pub abort_signal: Arc<AbortSignal>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            correlation_id: uuid::Uuid::new_v4().to_string(),
            abort_signal: Arc::new(AbortSignal::new()),
        }
    }

    /// Check if the operation should be aborted.
    pub fn is_aborted(&self) -> bool {
        self.abort_signal.is_aborted()
    }
}

/// Signal for aborting operations.
pub struct AbortSignal {
    aborted: AtomicBool,
}

impl AbortSignal {
    /// Create a new abort signal.
    pub fn new() -> Self {
        Self {
            aborted: AtomicBool::new(false),
        }
    }

    /// Check if aborted.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Trigger the abort.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

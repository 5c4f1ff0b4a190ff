//! Engine error types.

use thiserror::Error;

/// Errors reported by a browser engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Script raised an exception; the message is kept verbatim.
    #[error("{0}")]
    Script(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Browser engine is not running")]
    Disconnected,
}

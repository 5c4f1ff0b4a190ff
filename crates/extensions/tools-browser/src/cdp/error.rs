//! CDP error types.

use thiserror::Error;

use crate::engine::EngineError;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// No Chrome executable in the known install locations.
    #[error("Chrome executable not found")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error during endpoint discovery.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Exception thrown by an evaluated script.
    #[error("{0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<CdpError> for EngineError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ChromeNotFound | CdpError::LaunchFailed(_) => {
                EngineError::Launch(e.to_string())
            }
            CdpError::ConnectionFailed(_)
            | CdpError::ChromeNotAvailable(_)
            | CdpError::WebSocket(_)
            | CdpError::Http(_) => EngineError::Connection(e.to_string()),
            CdpError::NavigationFailed(message) => EngineError::Navigation(message),
            CdpError::JavaScript(message) => EngineError::Script(message),
            CdpError::Timeout(_) => EngineError::DeadlineExceeded,
            CdpError::SessionClosed => EngineError::Disconnected,
            CdpError::Protocol { .. }
            | CdpError::Serialization(_)
            | CdpError::InvalidResponse(_) => EngineError::Protocol(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_exception_keeps_message() {
        let err: EngineError = CdpError::JavaScript("ReferenceError: x is not defined".into()).into();
        assert!(matches!(err, EngineError::Script(_)));
        assert_eq!(err.to_string(), "ReferenceError: x is not defined");
    }

    #[test]
    fn test_closed_session_is_disconnect() {
        let err: EngineError = CdpError::SessionClosed.into();
        assert!(matches!(err, EngineError::Disconnected));
        assert_eq!(err.to_string(), "Browser engine is not running");
    }

    #[test]
    fn test_launch_errors() {
        let err: EngineError = CdpError::ChromeNotFound.into();
        assert_eq!(
            err.to_string(),
            "Failed to launch browser: Chrome executable not found"
        );
    }

    #[test]
    fn test_protocol_error_display() {
        let err: EngineError = CdpError::Protocol {
            code: -32000,
            message: "Cannot navigate".into(),
        }
        .into();
        assert!(matches!(err, EngineError::Protocol(_)));
        assert!(err.to_string().contains("Cannot navigate (code: -32000)"));
    }

    #[test]
    fn test_navigation_error() {
        let err: EngineError = CdpError::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".into()).into();
        assert_eq!(err.to_string(), "Navigation failed: net::ERR_NAME_NOT_RESOLVED");
    }
}

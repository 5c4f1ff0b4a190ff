//! Script execution errors.

use thiserror::Error;

use crate::engine::EngineError;

/// Why a script (or navigation) routed through the bridge failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Script execution timed out")]
    Timeout,

    /// Engine-reported fault, message preserved verbatim.
    #[error("{0}")]
    EngineError(String),

    #[error("Malformed script result")]
    MalformedResult,

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),
}

impl From<EngineError> for ScriptError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Script(message) => ScriptError::EngineError(message),
            EngineError::DeadlineExceeded => ScriptError::Timeout,
            other => ScriptError::EngineError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_display() {
        let err = ScriptError::ElementNotFound("#nonexistent".to_string());
        assert_eq!(err.to_string(), "Element not found: #nonexistent");
    }

    #[test]
    fn test_engine_message_kept_verbatim() {
        let err = ScriptError::from(EngineError::Script(
            "SyntaxError: '##' is not a valid selector".to_string(),
        ));
        assert_eq!(err.to_string(), "SyntaxError: '##' is not a valid selector");
    }

    #[test]
    fn test_engine_deadline_maps_to_timeout() {
        assert_eq!(ScriptError::from(EngineError::DeadlineExceeded), ScriptError::Timeout);
    }

    #[test]
    fn test_disconnected_maps_to_engine_error() {
        let err = ScriptError::from(EngineError::Disconnected);
        assert!(matches!(err, ScriptError::EngineError(msg) if msg.contains("not running")));
    }
}

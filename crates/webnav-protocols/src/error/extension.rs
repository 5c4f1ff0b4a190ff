//! Extension-related errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("Extension initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Tool not registered: {0}")]
    NotRegistered(String),

    #[error("Extension shutdown failed: {0}")]
    ShutdownFailed(String),

    #[error("{0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_registered_error() {
        let err = ExtensionError::AlreadyRegistered("navigate".to_string());
        let display = err.to_string();
        assert!(display.contains("already registered"));
        assert!(display.contains("navigate"));
    }

    #[test]
    fn test_shutdown_failed_error() {
        let err = ExtensionError::ShutdownFailed("engine thread panicked".to_string());
        assert!(err.to_string().contains("engine thread panicked"));
    }

    #[test]
    fn test_custom_error_is_verbatim() {
        let err = ExtensionError::Custom("something odd".to_string());
        assert_eq!(err.to_string(), "something odd");
    }
}

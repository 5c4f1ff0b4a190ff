//! Tool execution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tool execution was cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_not_found() {
        let err = ToolError::NotFound("getPageText".to_string());
        assert!(err.to_string().contains("Tool not found"));
        assert!(err.to_string().contains("getPageText"));
    }

    #[test]
    fn test_tool_error_invalid_parameters() {
        let err = ToolError::InvalidParameters("missing field `selector`".to_string());
        assert!(err.to_string().contains("Invalid parameters"));
        assert!(err.to_string().contains("selector"));
    }

    #[test]
    fn test_tool_error_cancelled() {
        let err = ToolError::Cancelled;
        assert!(err.to_string().contains("cancelled"));
    }
}

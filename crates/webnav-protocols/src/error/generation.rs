//! Secondary text generation errors.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Unavailable("no secondary model configured".to_string());
        assert!(err.to_string().contains("unavailable"));
    }
}

//! Domain-level error taxonomy for MecaBot.

use category_store::StoreError;
use llm_gateway::GatewayError;

/// Errors produced by intake validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Problem description cannot be blank.")]
    Blank,

    #[error("Problem description must be between 10 and 2000 characters.")]
    Length { chars: usize },
}

/// MecaBot domain errors.
#[derive(Debug, thiserror::Error)]
pub enum MecabotError {
    #[error("category store error: {0}")]
    Store(#[from] StoreError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for MecaBot domain operations.
pub type Result<T> = std::result::Result<T, MecabotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_wraps() {
        let err: MecabotError = StoreError::Connection("refused".to_string()).into();
        assert!(err.to_string().contains("category store error"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_validation_error_wraps() {
        let err: MecabotError = ValidationError::Blank.into();
        assert_eq!(
            err.to_string(),
            "validation error: Problem description cannot be blank."
        );
    }
}

//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),

    #[error("Invalid debate parameters: {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::InvalidAgent("empty name".to_string());
        assert_eq!(error.to_string(), "Invalid agent: empty name");
    }
}

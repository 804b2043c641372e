//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The subject of a debate (Value Object)
///
/// Supplied once when the debate starts and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question {
    content: String,
}

impl Question {
    /// Validate and build a question. Surrounding whitespace is trimmed.
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}

impl std::str::FromStr for Question {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_trimmed() {
        let q = Question::new("  What is the capital of Lithuania?\n").unwrap();
        assert_eq!(q.content(), "What is the capital of Lithuania?");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert!(Question::new("").is_err());
        assert!("   ".parse::<Question>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let q = Question::new("Monolith or microservices?").unwrap();
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            "\"Monolith or microservices?\""
        );
    }
}

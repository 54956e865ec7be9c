//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("At least one question is required")]
    NoQuestions,

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Invalid tool declaration '{name}': {reason}")]
    InvalidToolDeclaration { name: String, reason: String },
}

impl DomainError {
    /// Whether the error came from parsing data sent by a remote actor
    pub fn is_wire_error(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedEvent(_) | DomainError::InvalidToolDeclaration { .. }
        )
    }
}

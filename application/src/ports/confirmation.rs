//! Confirmation port for the ask-user dialog.
//!
//! This module defines the port for putting an ask-user dialog in front of
//! a person and collecting their answers.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`ConfirmationPort`] - defined here in application layer
//! - **Adapter**: `ConsoleConfirmation` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! AskUserInvocation::should_confirm_execute()
//!        ↓
//! ConfirmationPort::request_answers(title, questions)
//!        ↓
//! Person answers / dismisses
//!        ↓
//! ConfirmHandle::confirm(outcome, answers)
//!        ↓
//! AskUserInvocation::execute()
//! ```
//!
//! # Built-in Implementations
//!
//! - [`AutoDismissConfirmation`] - Always dismisses the dialog
//! - [`ScriptedConfirmation`] - Submits a fixed list of answers

use async_trait::async_trait;
use bridge_domain::{AnswerSet, ConfirmationOutcome, Question};
use thiserror::Error;

/// Error type for confirmation operations.
///
/// These represent failures while collecting answers, not a dismissal by
/// the person (which is [`ConfirmationOutcome::Cancel`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// Input was interrupted (e.g., stdin closed).
    #[error("Confirmation interrupted")]
    Interrupted,

    /// Terminal read/write failure.
    #[error("I/O error: {0}")]
    Io(String),
}

/// What the person decided, plus any answers given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResponse {
    pub outcome: ConfirmationOutcome,
    pub answers: AnswerSet,
}

impl ConfirmationResponse {
    pub fn submitted(answers: AnswerSet) -> Self {
        Self {
            outcome: ConfirmationOutcome::ProceedOnce,
            answers,
        }
    }

    pub fn dismissed() -> Self {
        Self {
            outcome: ConfirmationOutcome::Cancel,
            answers: AnswerSet::new(),
        }
    }
}

/// Port for presenting an ask-user dialog.
///
/// # Implementations
///
/// - **Interactive (CLI)**: `ConsoleConfirmation` in presentation layer
/// - **Auto-dismiss**: [`AutoDismissConfirmation`]
/// - **Scripted**: [`ScriptedConfirmation`]
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Show the dialog and wait for the person.
    ///
    /// `questions` arrive normalized (every question has a type).
    async fn request_answers(
        &self,
        title: &str,
        questions: &[Question],
    ) -> Result<ConfirmationResponse, ConfirmationError>;
}

/// Dismisses every dialog.
///
/// Used when no person is attached; the engine receives a dismissal result.
pub struct AutoDismissConfirmation;

#[async_trait]
impl ConfirmationPort for AutoDismissConfirmation {
    async fn request_answers(
        &self,
        _title: &str,
        _questions: &[Question],
    ) -> Result<ConfirmationResponse, ConfirmationError> {
        Ok(ConfirmationResponse::dismissed())
    }
}

/// Submits a fixed list of answers, one per question in order.
///
/// Answers beyond the question count are ignored; questions beyond the
/// answer count stay unanswered.
pub struct ScriptedConfirmation {
    answers: Vec<String>,
}

impl ScriptedConfirmation {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirmation {
    async fn request_answers(
        &self,
        _title: &str,
        questions: &[Question],
    ) -> Result<ConfirmationResponse, ConfirmationError> {
        let answers = self
            .answers
            .iter()
            .take(questions.len())
            .cloned()
            .enumerate()
            .collect();
        Ok(ConfirmationResponse::submitted(answers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![Question::new("Deploy?", "Deploy"), Question::new("Notify?", "Notify")]
    }

    #[tokio::test]
    async fn test_auto_dismiss() {
        let response = AutoDismissConfirmation
            .request_answers("Answer Questions", &questions())
            .await
            .unwrap();
        assert!(response.outcome.is_cancel());
        assert!(response.answers.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_truncates_to_question_count() {
        let port = ScriptedConfirmation::new(["yes", "no", "maybe"]);
        let response = port.request_answers("Answer Questions", &questions()).await.unwrap();
        assert_eq!(response.outcome, ConfirmationOutcome::ProceedOnce);
        assert_eq!(response.answers.len(), 2);
        assert_eq!(response.answers.get(1), Some("no"));
    }
}

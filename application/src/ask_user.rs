//! Ask-user tool: pauses a tool call for a person to answer questions.
//!
//! Unlike remote tools, nothing is published or correlated here. The
//! suspension point is the confirmation step:
//!
//! ```text
//! create_invocation(params)          rejects an empty question list
//!        ↓
//! should_confirm_execute()           → ConfirmationDetails { title, questions, handle }
//!        ↓
//! (pipeline shows the dialog)
//!        ↓
//! handle.confirm(outcome, answers)   first confirmation wins
//!        ↓
//! execute()                          → ToolResult
//! ```
//!
//! Dismissal is a normal outcome, not a failure.

use crate::error::BridgeError;
use bridge_domain::interaction::question::positional_label;
use bridge_domain::{
    AnswerSet, ConfirmationOutcome, DomainError, Question, ToolDescriptor, ToolKind, ToolResult,
};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

pub const ASK_USER_TOOL_NAME: &str = "ask_user";

const DIALOG_TITLE: &str = "Answer Questions";

const DISMISSED_LLM_CONTENT: &str = "User dismissed ask_user dialog without answering.";
const DISMISSED_DISPLAY: &str = "User dismissed dialog";
const NO_ANSWERS_DISPLAY: &str = "User submitted without answering questions.";

#[derive(Deserialize)]
struct AskUserParams {
    questions: Vec<Question>,
}

pub struct AskUserTool {
    descriptor: ToolDescriptor,
}

impl Default for AskUserTool {
    fn default() -> Self {
        Self::new()
    }
}

impl AskUserTool {
    pub fn new() -> Self {
        let descriptor = ToolDescriptor::new(
            ASK_USER_TOOL_NAME,
            "Ask the user one to four short questions and wait for their answers. \
             Use when a decision needs human input before continuing.",
        )
        .with_display_name("Ask User")
        .with_kind(ToolKind::Communicate)
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "minItems": 1,
                    "maxItems": bridge_domain::interaction::MAX_QUESTIONS,
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string", "description": "The full question" },
                            "header": {
                                "type": "string",
                                "maxLength": bridge_domain::interaction::MAX_HEADER_CHARS,
                                "description": "Short label used when summarizing the answer"
                            },
                            "type": { "type": "string", "enum": ["text", "yesno"] },
                            "placeholder": { "type": "string" }
                        },
                        "required": ["question", "header"]
                    }
                }
            },
            "required": ["questions"]
        }));
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn create_invocation(&self, params: serde_json::Value) -> Result<AskUserInvocation, BridgeError> {
        let params: AskUserParams =
            serde_json::from_value(params).map_err(|e| BridgeError::InvalidParams {
                tool: ASK_USER_TOOL_NAME.to_string(),
                message: e.to_string(),
            })?;

        if params.questions.is_empty() {
            return Err(DomainError::NoQuestions.into());
        }

        Ok(AskUserInvocation {
            questions: params.questions,
            state: Arc::new(Mutex::new(DialogState::default())),
        })
    }
}

#[derive(Default)]
struct DialogState {
    outcome: Option<ConfirmationOutcome>,
    answers: AnswerSet,
}

fn lock(state: &Mutex<DialogState>) -> MutexGuard<'_, DialogState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The one-shot callback that records a person's answers.
///
/// Every handle issued by one invocation shares its dialog state, and only
/// the first confirmation across all of them is recorded.
pub struct ConfirmHandle {
    state: Arc<Mutex<DialogState>>,
}

impl ConfirmHandle {
    /// Record the outcome. Returns `false`, leaving the earlier answers in
    /// place, when the invocation was already confirmed.
    pub fn confirm(self, outcome: ConfirmationOutcome, answers: AnswerSet) -> bool {
        let mut state = lock(&self.state);
        if state.outcome.is_some() {
            warn!("ask_user already confirmed; ignoring a second confirmation");
            return false;
        }
        state.outcome = Some(outcome);
        state.answers = answers;
        true
    }
}

impl std::fmt::Debug for ConfirmHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmHandle").finish_non_exhaustive()
    }
}

/// What the pipeline must show before the ask-user call can run.
#[derive(Debug)]
pub struct ConfirmationDetails {
    pub title: String,
    /// Questions with their type filled in.
    pub questions: Vec<Question>,
    pub handle: ConfirmHandle,
}

pub struct AskUserInvocation {
    questions: Vec<Question>,
    state: Arc<Mutex<DialogState>>,
}

impl std::fmt::Debug for AskUserInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AskUserInvocation")
            .field("questions", &self.questions)
            .field("confirmed", &lock(&self.state).outcome.is_some())
            .finish()
    }
}

impl AskUserInvocation {
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn should_confirm_execute(&self) -> ConfirmationDetails {
        ConfirmationDetails {
            title: DIALOG_TITLE.to_string(),
            questions: self.questions.iter().map(Question::normalized).collect(),
            handle: ConfirmHandle {
                state: Arc::clone(&self.state),
            },
        }
    }

    pub fn execute(&self) -> ToolResult {
        let state = lock(&self.state);

        let outcome = match state.outcome {
            Some(outcome) => outcome,
            None => {
                warn!("ask_user executed before confirmation; treating as dismissed");
                ConfirmationOutcome::Cancel
            }
        };

        if outcome.is_cancel() {
            debug!("ask_user dismissed");
            return ToolResult::with_display(DISMISSED_LLM_CONTENT, DISMISSED_DISPLAY);
        }

        let llm_content = serde_json::json!({ "answers": state.answers }).to_string();
        if state.answers.is_empty() {
            return ToolResult::with_display(llm_content, NO_ANSWERS_DISPLAY);
        }

        let display = state
            .answers
            .iter()
            .map(|(index, answer)| {
                let label = self
                    .questions
                    .get(index)
                    .map(|q| q.label(index))
                    .unwrap_or_else(|| positional_label(index));
                format!("{} → {}", label, answer)
            })
            .collect::<Vec<_>>()
            .join("\n");

        debug!("ask_user answered {} question(s)", state.answers.len());
        ToolResult::with_display(llm_content, display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_domain::QuestionType;
    use serde_json::json;

    fn two_questions() -> serde_json::Value {
        json!({
            "questions": [
                { "question": "Deploy to production?", "header": "Deploy", "type": "yesno" },
                { "question": "Notify the team?", "header": "Notify" }
            ]
        })
    }

    fn answers(pairs: &[(usize, &str)]) -> AnswerSet {
        pairs.iter().map(|(i, a)| (*i, *a)).collect()
    }

    #[test]
    fn test_descriptor() {
        let tool = AskUserTool::new();
        assert_eq!(tool.descriptor().name, "ask_user");
        assert_eq!(tool.descriptor().kind, ToolKind::Communicate);
        let schema = &tool.descriptor().parameter_schema;
        assert_eq!(schema["properties"]["questions"]["maxItems"], 4);
        assert_eq!(
            schema["properties"]["questions"]["items"]["properties"]["header"]["maxLength"],
            16
        );
    }

    #[test]
    fn test_empty_questions_rejected() {
        let err = AskUserTool::new()
            .create_invocation(json!({ "questions": [] }))
            .unwrap_err();
        assert_eq!(err, BridgeError::Domain(DomainError::NoQuestions));
    }

    #[test]
    fn test_malformed_params_rejected() {
        let err = AskUserTool::new().create_invocation(json!({ "q": 1 })).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidParams { .. }));
    }

    #[test]
    fn test_confirmation_details_normalize_types() {
        let invocation = AskUserTool::new().create_invocation(two_questions()).unwrap();
        let details = invocation.should_confirm_execute();

        assert_eq!(details.title, "Answer Questions");
        assert_eq!(details.questions.len(), 2);
        assert_eq!(details.questions[0].question_type, Some(QuestionType::YesNo));
        assert_eq!(details.questions[1].question_type, Some(QuestionType::Text));
        // The invocation keeps the questions as given
        assert!(invocation.questions()[1].question_type.is_none());
    }

    #[test]
    fn test_two_answers() {
        let invocation = AskUserTool::new().create_invocation(two_questions()).unwrap();
        invocation
            .should_confirm_execute()
            .handle
            .confirm(ConfirmationOutcome::ProceedOnce, answers(&[(0, "yes"), (1, "no")]));

        let result = invocation.execute();
        assert!(result.is_success());
        assert_eq!(result.llm_content, r#"{"answers":{"0":"yes","1":"no"}}"#);
        assert_eq!(result.display(), "Deploy → yes\nNotify → no");
        assert_eq!(result.display().lines().count(), 2);
    }

    #[test]
    fn test_zero_answers() {
        let invocation = AskUserTool::new().create_invocation(two_questions()).unwrap();
        invocation
            .should_confirm_execute()
            .handle
            .confirm(ConfirmationOutcome::ProceedOnce, AnswerSet::new());

        let result = invocation.execute();
        assert!(result.is_success());
        assert_eq!(result.display(), "User submitted without answering questions.");
        assert_eq!(result.llm_content, r#"{"answers":{}}"#);
    }

    #[test]
    fn test_dismissal_is_not_a_failure() {
        let invocation = AskUserTool::new().create_invocation(two_questions()).unwrap();
        invocation
            .should_confirm_execute()
            .handle
            .confirm(ConfirmationOutcome::Cancel, answers(&[(0, "ignored")]));

        let result = invocation.execute();
        assert!(result.is_success());
        assert_eq!(result.llm_content, "User dismissed ask_user dialog without answering.");
        assert_eq!(result.display(), "User dismissed dialog");
    }

    #[test]
    fn test_positional_label_fallback() {
        let invocation = AskUserTool::new()
            .create_invocation(json!({
                "questions": [
                    { "question": "Name?", "header": "" },
                    { "question": "Age?", "header": "Age" }
                ]
            }))
            .unwrap();
        invocation.should_confirm_execute().handle.confirm(
            ConfirmationOutcome::ProceedAlways,
            answers(&[(0, "Ada"), (1, "36"), (3, "extra")]),
        );

        let result = invocation.execute();
        assert_eq!(result.display(), "Q1 → Ada\nAge → 36\nQ4 → extra");
    }

    #[test]
    fn test_only_first_confirmation_counts() {
        let invocation = AskUserTool::new().create_invocation(two_questions()).unwrap();
        let first = invocation.should_confirm_execute();
        let second = invocation.should_confirm_execute();

        assert!(first.handle.confirm(ConfirmationOutcome::ProceedOnce, answers(&[(0, "yes")])));
        assert!(!second.handle.confirm(ConfirmationOutcome::Cancel, AnswerSet::new()));

        let result = invocation.execute();
        assert_eq!(result.display(), "Deploy → yes");
        assert!(format!("{:?}", invocation).contains("confirmed: true"));
    }

    #[test]
    fn test_unconfirmed_execute_is_dismissal() {
        let invocation = AskUserTool::new().create_invocation(two_questions()).unwrap();
        assert_eq!(invocation.execute().display(), "User dismissed dialog");
    }
}

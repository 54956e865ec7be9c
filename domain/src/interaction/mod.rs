//! Interaction domain module: structured questions put to a person.
//!
//! The ask-user tool pauses a tool call until a human answers a short,
//! ordered list of [`Question`]s. Answers come back as an [`AnswerSet`]
//! keyed by question index, together with a [`ConfirmationOutcome`] that
//! says whether the dialog was submitted or dismissed.
//!
//! # Examples
//!
//! ```
//! use bridge_domain::interaction::{AnswerSet, Question, QuestionType};
//!
//! let q = Question::new("Deploy to production?", "Deploy").with_type(QuestionType::YesNo);
//! assert_eq!(q.kind(), QuestionType::YesNo);
//!
//! let mut answers = AnswerSet::new();
//! answers.insert(0, "yes");
//! assert_eq!(serde_json::to_string(&answers).unwrap(), r#"{"0":"yes"}"#);
//! ```

pub mod answers;
pub mod question;

pub use answers::{AnswerSet, ConfirmationOutcome};
pub use question::{Question, QuestionType, MAX_HEADER_CHARS, MAX_QUESTIONS};

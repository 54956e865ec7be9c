//! Question value object

use serde::{Deserialize, Serialize};

/// Maximum number of questions in a single ask-user call
pub const MAX_QUESTIONS: usize = 4;

/// Maximum length of a question header, in characters
pub const MAX_HEADER_CHARS: usize = 16;

/// How a question expects to be answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Free-form text
    #[default]
    Text,
    /// A yes/no choice
    YesNo,
}

impl QuestionType {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Text => "text",
            QuestionType::YesNo => "yesno",
        }
    }
}

/// A single question (Value Object)
///
/// `header` is a short label (at most [`MAX_HEADER_CHARS`]) used when the
/// answers are summarized. The type may be omitted by the engine; use
/// [`normalized`](Self::normalized) to fill in the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub header: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Question {
    pub fn new(question: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            header: header.into(),
            question_type: None,
            placeholder: None,
        }
    }

    pub fn with_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Effective type, defaulting to free text
    pub fn kind(&self) -> QuestionType {
        self.question_type.unwrap_or_default()
    }

    /// Copy with the type filled in
    pub fn normalized(&self) -> Self {
        Self {
            question_type: Some(self.kind()),
            ..self.clone()
        }
    }

    /// Header to show for this question, falling back to a positional label
    pub fn label(&self, index: usize) -> String {
        if self.header.trim().is_empty() {
            positional_label(index)
        } else {
            self.header.clone()
        }
    }
}

/// `Q1`, `Q2`, ... for zero-based `index`
pub fn positional_label(index: usize) -> String {
    format!("Q{}", index + 1)
}

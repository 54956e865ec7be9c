//! Answers and confirmation outcomes

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// What the person did with a confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    /// Submit for this call only
    ProceedOnce,
    /// Submit and stop asking for this tool
    ProceedAlways,
    /// Dismissed without submitting
    Cancel,
}

impl ConfirmationOutcome {
    pub fn is_cancel(&self) -> bool {
        matches!(self, ConfirmationOutcome::Cancel)
    }
}

impl std::str::FromStr for ConfirmationOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proceed_once" => Ok(Self::ProceedOnce),
            "proceed_always" => Ok(Self::ProceedAlways),
            "cancel" => Ok(Self::Cancel),
            other => Err(format!("Unknown confirmation outcome: {}", other)),
        }
    }
}

/// Answers keyed by zero-based question index, in question order.
///
/// Serializes as a JSON object with string keys: `{"0":"yes","1":"no"}`.
/// Keys are parsed by hand on the way back in, so the set also decodes
/// when it sits inside an internally tagged enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<usize, String>);

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, answer)| {
                key.trim()
                    .parse::<usize>()
                    .map(|index| (index, answer))
                    .map_err(|_| serde::de::Error::custom(format!("answer key '{}' is not a question index", key)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing an earlier answer to the same question
    pub fn insert(&mut self, index: usize, answer: impl Into<String>) {
        self.0.insert(index, answer.into());
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(i, a)| (*i, a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(i, a)| (i, a.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_set_serializes_with_string_keys() {
        let answers: AnswerSet = [(1, "no"), (0, "yes")].into_iter().collect();
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"0":"yes","1":"no"}"#);

        let back: AnswerSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(1), Some("no"));
    }

    #[test]
    fn test_answer_set_inside_tagged_enum() {
        #[derive(Deserialize)]
        #[serde(tag = "type", rename_all = "snake_case")]
        enum Envelope {
            Answer { answers: AnswerSet },
        }

        let Envelope::Answer { answers } =
            serde_json::from_str(r#"{"type":"answer","answers":{"0":"yes","3":"blue"}}"#).unwrap();
        assert_eq!(answers.get(0), Some("yes"));
        assert_eq!(answers.get(3), Some("blue"));
    }

    #[test]
    fn test_answer_set_rejects_non_index_keys() {
        let err = serde_json::from_str::<AnswerSet>(r#"{"first":"yes"}"#).unwrap_err();
        assert!(err.to_string().contains("first"));
    }

    #[test]
    fn test_answer_set_insert_replaces() {
        let mut answers = AnswerSet::new();
        answers.insert(0, "draft");
        answers.insert(0, "final");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(0), Some("final"));
    }

    #[test]
    fn test_outcome_wire_names() {
        assert_eq!(
            serde_json::to_value(ConfirmationOutcome::ProceedOnce).unwrap(),
            "proceed_once"
        );
        assert_eq!("cancel".parse::<ConfirmationOutcome>().unwrap(), ConfirmationOutcome::Cancel);
        assert!(ConfirmationOutcome::Cancel.is_cancel());
        assert!(!ConfirmationOutcome::ProceedAlways.is_cancel());
    }
}

//! Session identifiers

use serde::{Deserialize, Serialize};

/// Identifiers of the session a tool is bound to.
///
/// Together with a publishing channel these form the call context; the
/// channel lives in the application layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIds {
    pub task_id: String,
    pub context_id: String,
}

impl SessionIds {
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
        }
    }
}

//! Ask-user dialogs answered by the host instead of a local terminal.
//!
//! When the bridge serves over stdio, stdin carries protocol lines, so the
//! dialog is forwarded as a `question` line and the host replies with an
//! `answer` command naming the same dialog id.

use super::host_protocol::HostOutput;
use super::jsonl::JsonLinesWriter;
use async_trait::async_trait;
use bridge_application::{ConfirmationError, ConfirmationPort, ConfirmationResponse};
use bridge_domain::{CallId, Question};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

pub struct HostConfirmation {
    writer: JsonLinesWriter,
    pending: Mutex<HashMap<String, oneshot::Sender<ConfirmationResponse>>>,
}

impl HostConfirmation {
    pub fn new(writer: JsonLinesWriter) -> Self {
        Self {
            writer,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Complete an open dialog. Returns false if the id is unknown or the
    /// dialog was already abandoned.
    pub fn answer(&self, dialog_id: &str, response: ConfirmationResponse) -> bool {
        let waiter = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(dialog_id);

        match waiter {
            Some(tx) => tx.send(response).is_ok(),
            None => {
                warn!("Answer for unknown dialog {}; dropping", dialog_id);
                false
            }
        }
    }

    /// Interrupt every open dialog, e.g. when the host disconnects.
    pub fn interrupt_all(&self) {
        let drained = std::mem::take(&mut *self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
        if !drained.is_empty() {
            debug!("Interrupting {} open dialog(s)", drained.len());
        }
    }

    pub fn open_dialogs(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn forget(&self, dialog_id: &str) {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(dialog_id);
    }
}

#[async_trait]
impl ConfirmationPort for HostConfirmation {
    async fn request_answers(
        &self,
        title: &str,
        questions: &[Question],
    ) -> Result<ConfirmationResponse, ConfirmationError> {
        let dialog_id = CallId::generate().as_str().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(dialog_id.clone(), tx);

        let question = HostOutput::Question {
            dialog_id: dialog_id.clone(),
            title: title.to_string(),
            questions: questions.to_vec(),
        };
        if let Err(e) = self.writer.send(&question).await {
            self.forget(&dialog_id);
            return Err(ConfirmationError::Io(e.to_string()));
        }

        // A dropped sender means the dialog was interrupted
        rx.await.map_err(|_| ConfirmationError::Interrupted)
    }
}

//! Remote tool invocation: one call, from creation to settlement.
//!
//! # Suspending mode
//!
//! ```text
//! execute()
//!   ├─ mark AwaitingRemote
//!   ├─ publish call request (status-update, input-required)
//!   └─ select! (biased)
//!        ├─ cancellation token  ──> Cancelled
//!        ├─ correlator waiter   ──> Resolved | Failed
//!        └─ sleep(timeout)      ──> TimedOut
//! ```
//!
//! A deadline or cancellation only takes effect if it removes the waiter
//! from the correlator first; if a delivery already took it, the delivered
//! settlement wins.
//!
//! # Immediate mode
//!
//! No request is published and nothing waits: `execute` consumes whatever
//! the pending-result store holds for this call (or, under the any-match
//! policy, whatever it holds at all) and returns a missing-result failure
//! when the store is empty.

use super::correlator::{CallCorrelator, Settlement};
use super::pending_store::PendingResultStore;
use super::wrapper::CallContext;
use crate::error::BridgeError;
use crate::ports::call_journal::{CallJournal, JournalEvent};
use bridge_domain::{CallId, CallRecord, CallRequest, CallState, ToolError, ToolResult};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

enum Awaiting {
    Suspending {
        correlator: Arc<CallCorrelator>,
        receiver: Option<oneshot::Receiver<Settlement>>,
        timeout: Duration,
        emit_legacy_keys: bool,
    },
    Immediate {
        store: Arc<PendingResultStore>,
    },
}

/// What ended the suspension
enum Wake {
    Settled(Settlement),
    Closed,
    TimedOut,
    Cancelled,
}

pub struct RemoteToolInvocation {
    record: CallRecord,
    context: CallContext,
    awaiting: Awaiting,
    journal: Arc<dyn CallJournal>,
}

impl RemoteToolInvocation {
    /// Register with the correlator; deliveries arriving before `execute`
    /// are held by the waiter until it runs.
    ///
    /// Fails when another invocation with the same call id is outstanding.
    pub(crate) fn suspending(
        record: CallRecord,
        context: CallContext,
        correlator: Arc<CallCorrelator>,
        timeout: Duration,
        emit_legacy_keys: bool,
        journal: Arc<dyn CallJournal>,
    ) -> Result<Self, BridgeError> {
        let receiver = correlator
            .register(record.call_id.clone())
            .ok_or_else(|| BridgeError::DuplicateCallId(record.call_id.clone()))?;
        Ok(Self {
            record,
            context,
            awaiting: Awaiting::Suspending {
                correlator,
                receiver: Some(receiver),
                timeout,
                emit_legacy_keys,
            },
            journal,
        })
    }

    pub(crate) fn immediate(
        record: CallRecord,
        context: CallContext,
        store: Arc<PendingResultStore>,
        journal: Arc<dyn CallJournal>,
    ) -> Result<Self, BridgeError> {
        if !store.expect(&record.call_id) {
            return Err(BridgeError::DuplicateCallId(record.call_id));
        }
        Ok(Self {
            record,
            context,
            awaiting: Awaiting::Immediate { store },
            journal,
        })
    }

    pub fn call_id(&self) -> &CallId {
        &self.record.call_id
    }

    pub fn tool_name(&self) -> &str {
        &self.record.tool_name
    }

    pub fn params(&self) -> &serde_json::Value {
        &self.record.params
    }

    pub fn record(&self) -> &CallRecord {
        &self.record
    }

    pub fn state(&self) -> &CallState {
        self.record.state()
    }

    /// One-line description for logs and prompts
    pub fn description(&self) -> String {
        format!("Remote call to {} ({})", self.record.tool_name, self.record.call_id)
    }

    /// Run the call.
    ///
    /// Remote errors, timeouts and cancellation come back as `Err`; a
    /// missing result in immediate mode is an `Ok` failure result.
    pub async fn execute(&mut self, cancel: CancellationToken) -> Result<ToolResult, BridgeError> {
        if !self.record.mark_awaiting() {
            return Err(BridgeError::AlreadyExecuted(self.record.call_id.clone()));
        }
        self.journal.record(JournalEvent::new(
            "call_requested",
            json!({
                "callId": self.record.call_id,
                "tool": self.record.tool_name,
                "params": self.record.params,
                "deadlineMs": self.record.deadline_ms,
            }),
        ));

        let outcome = if cancel.is_cancelled() {
            self.release();
            self.record.mark_cancelled();
            Err(BridgeError::Cancelled(self.record.call_id.clone()))
        } else {
            match &mut self.awaiting {
                Awaiting::Immediate { store } => {
                    let store = Arc::clone(store);
                    Ok(self.consume(&store))
                }
                Awaiting::Suspending {
                    correlator,
                    receiver,
                    timeout,
                    emit_legacy_keys,
                } => {
                    let correlator = Arc::clone(correlator);
                    let receiver = receiver.take();
                    let (timeout, emit_legacy_keys) = (*timeout, *emit_legacy_keys);
                    match receiver {
                        Some(receiver) => {
                            self.suspend(correlator, receiver, timeout, emit_legacy_keys, cancel)
                                .await
                        }
                        None => Err(BridgeError::AlreadyExecuted(self.record.call_id.clone())),
                    }
                }
            }
        };

        self.journal.record(JournalEvent::new(
            "call_settled",
            json!({
                "callId": self.record.call_id,
                "tool": self.record.tool_name,
                "state": self.record.state().name(),
                "durationMs": self.record.state().duration_ms(),
                "error": outcome.as_ref().err().map(|e| e.to_string()),
            }),
        ));
        outcome
    }

    fn consume(&mut self, store: &PendingResultStore) -> ToolResult {
        match store.take(&self.record.call_id) {
            Some(result) => {
                debug!("{} read a stored result", self.description());
                if result.is_success() {
                    self.record.mark_resolved(result.clone());
                } else {
                    self.record.mark_failed(result.llm_content.clone());
                }
                result
            }
            None => {
                let error = ToolError::missing_result(&self.record.tool_name);
                debug!("{}: {}", self.description(), error.message);
                self.record.mark_failed(error.message.clone());
                ToolResult::failure(error)
            }
        }
    }

    async fn suspend(
        &mut self,
        correlator: Arc<CallCorrelator>,
        mut receiver: oneshot::Receiver<Settlement>,
        timeout: Duration,
        emit_legacy_keys: bool,
        cancel: CancellationToken,
    ) -> Result<ToolResult, BridgeError> {
        let call_id = self.record.call_id.clone();
        let request = CallRequest::new(
            call_id.clone(),
            self.record.tool_name.clone(),
            self.record.params.clone(),
        );
        let event = request.to_event(&self.context.ids, emit_legacy_keys);

        if let Err(e) = self.context.publisher.publish(event).await {
            warn!("Failed to publish call request {}: {}", call_id, e);
            correlator.abandon(&call_id);
            self.record.mark_failed(e.to_string());
            return Err(e.into());
        }
        info!(
            "Requested remote tool {} (call {}, deadline {}ms)",
            self.record.tool_name,
            call_id,
            timeout.as_millis()
        );

        let wake = tokio::select! {
            biased;
            _ = cancel.cancelled() => Wake::Cancelled,
            received = &mut receiver => match received {
                Ok(settlement) => Wake::Settled(settlement),
                Err(_) => Wake::Closed,
            },
            _ = tokio::time::sleep(timeout) => Wake::TimedOut,
        };

        // A deadline or cancellation only counts if it got to the waiter first
        let wake = match wake {
            Wake::TimedOut | Wake::Cancelled if !correlator.abandon(&call_id) => {
                // The sender is already out of the map; it sends or drops without waiting
                match (&mut receiver).await {
                    Ok(settlement) => {
                        debug!("Call {} settled at its deadline; keeping the delivery", call_id);
                        Wake::Settled(settlement)
                    }
                    Err(_) => Wake::Closed,
                }
            }
            other => other,
        };

        match wake {
            Wake::Settled(Settlement::Result(result)) => {
                debug!("Call {} resolved", call_id);
                self.record.mark_resolved(result.clone());
                Ok(result)
            }
            Wake::Settled(Settlement::Error(message)) => {
                debug!("Call {} failed remotely: {}", call_id, message);
                self.record.mark_failed(message.clone());
                Err(BridgeError::RemoteDelivery { call_id, message })
            }
            Wake::Closed => {
                let message = "delivery channel closed before a result arrived".to_string();
                warn!("Call {}: {}", call_id, message);
                self.record.mark_failed(message.clone());
                Err(BridgeError::RemoteDelivery { call_id, message })
            }
            Wake::TimedOut => {
                warn!(
                    "Call {} to {} timed out after {}ms",
                    call_id,
                    self.record.tool_name,
                    timeout.as_millis()
                );
                self.record.mark_timed_out();
                Err(BridgeError::RemoteTimeout {
                    call_id,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Wake::Cancelled => {
                info!("Call {} cancelled", call_id);
                self.record.mark_cancelled();
                Err(BridgeError::Cancelled(call_id))
            }
        }
    }

    /// Withdraw from the correlator or the store
    fn release(&self) {
        match &self.awaiting {
            Awaiting::Suspending { correlator, .. } => {
                correlator.abandon(&self.record.call_id);
            }
            Awaiting::Immediate { store } => store.forget(&self.record.call_id),
        }
    }
}

impl Drop for RemoteToolInvocation {
    fn drop(&mut self) {
        if !self.record.is_terminal() {
            debug!("{} dropped before settling", self.description());
            self.release();
        }
    }
}

impl std::fmt::Debug for RemoteToolInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteToolInvocation")
            .field("record", &self.record)
            .field("ids", &self.context.ids)
            .finish()
    }
}

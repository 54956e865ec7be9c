//! Call correlator for suspending invocations.
//!
//! Each outstanding call owns one `oneshot` waiter keyed by call id. The
//! remote-delivery path removes the waiter and sends through it, so a call
//! settles at most once: whoever removes the sender first (a delivery, the
//! deadline or a cancellation) wins, and every later attempt finds nothing.
//!
//! One correlator is shared by every remote tool in a registry so a
//! delivery can be routed by call id alone.

use bridge_domain::{CallId, ToolResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// What the remote actor settled a call with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Result(ToolResult),
    Error(String),
}

/// Whether a delivery reached a waiting invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// No outstanding call with that id; the delivery was dropped.
    Unknown,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

#[derive(Default)]
pub struct CallCorrelator {
    waiters: Mutex<HashMap<CallId, oneshot::Sender<Settlement>>>,
}

impl CallCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CallId, oneshot::Sender<Settlement>>> {
        self.waiters.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an outstanding call and get the receiving half of its waiter.
    ///
    /// Returns `None` when the id is already outstanding; the existing
    /// waiter is left untouched.
    pub fn register(&self, call_id: CallId) -> Option<oneshot::Receiver<Settlement>> {
        let mut waiters = self.lock();
        if waiters.contains_key(&call_id) {
            warn!("Call id {} is already outstanding", call_id);
            return None;
        }
        let (tx, rx) = oneshot::channel();
        waiters.insert(call_id, tx);
        Some(rx)
    }

    /// Settle a call with a success result.
    pub fn resolve(&self, call_id: &CallId, result: ToolResult) -> DeliveryOutcome {
        self.settle(call_id, Settlement::Result(result))
    }

    /// Settle a call with a remote error.
    pub fn reject(&self, call_id: &CallId, message: impl Into<String>) -> DeliveryOutcome {
        self.settle(call_id, Settlement::Error(message.into()))
    }

    fn settle(&self, call_id: &CallId, settlement: Settlement) -> DeliveryOutcome {
        // Remove before sending so the lock is not held across the send
        let sender = self.lock().remove(call_id);

        let Some(sender) = sender else {
            warn!("Dropping delivery for unknown call id {}", call_id);
            return DeliveryOutcome::Unknown;
        };

        if sender.send(settlement).is_err() {
            debug!("Invocation for call id {} went away before delivery", call_id);
            return DeliveryOutcome::Unknown;
        }
        DeliveryOutcome::Delivered
    }

    /// Remove the waiter for a call that timed out or was cancelled.
    ///
    /// Returns `false` when the waiter was already gone, i.e. a delivery won.
    pub fn abandon(&self, call_id: &CallId) -> bool {
        self.lock().remove(call_id).is_some()
    }

    pub fn is_outstanding(&self, call_id: &CallId) -> bool {
        self.lock().contains_key(call_id)
    }

    /// Number of calls still waiting.
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }
}

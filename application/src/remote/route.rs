//! Routing of remote deliveries to the correlator or the store

use super::correlator::{CallCorrelator, DeliveryOutcome};
use super::pending_store::{PendingResultStore, StoreOutcome};
use crate::config::DeliveryMode;
use bridge_domain::{CallId, ToolError, ToolResult};
use std::sync::Arc;

/// Where results and errors from the remote actor go.
///
/// Suspending mode settles waiting invocations through the correlator and
/// drops deliveries for ids with no waiter. Immediate mode parks results in
/// the pending-result store, including ones that arrive before their call,
/// and drops only ids already consumed or forgotten. Nothing here returns
/// an error.
#[derive(Clone)]
pub struct DeliveryRoute {
    mode: DeliveryMode,
    correlator: Arc<CallCorrelator>,
    store: Arc<PendingResultStore>,
}

impl DeliveryRoute {
    pub fn new(mode: DeliveryMode, correlator: Arc<CallCorrelator>, store: Arc<PendingResultStore>) -> Self {
        Self {
            mode,
            correlator,
            store,
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub fn correlator(&self) -> &Arc<CallCorrelator> {
        &self.correlator
    }

    pub fn store(&self) -> &Arc<PendingResultStore> {
        &self.store
    }

    pub fn result(&self, call_id: &CallId, result: ToolResult) -> DeliveryOutcome {
        match self.mode {
            DeliveryMode::Suspending => self.correlator.resolve(call_id, result),
            DeliveryMode::Immediate { .. } => store_outcome(self.store.insert(call_id, result)),
        }
    }

    pub fn error(&self, call_id: &CallId, message: impl Into<String>) -> DeliveryOutcome {
        match self.mode {
            DeliveryMode::Suspending => self.correlator.reject(call_id, message),
            DeliveryMode::Immediate { .. } => {
                let failure = ToolResult::failure(ToolError::remote_delivery(message));
                store_outcome(self.store.insert(call_id, failure))
            }
        }
    }
}

fn store_outcome(outcome: StoreOutcome) -> DeliveryOutcome {
    match outcome {
        StoreOutcome::Stored | StoreOutcome::Overwrote => DeliveryOutcome::Delivered,
        StoreOutcome::Unknown => DeliveryOutcome::Unknown,
    }
}

//! Remote tool wrapper: the registry-facing side of a remote tool.
//!
//! A wrapper declares a tool to the reasoning engine and turns each engine
//! call into a [`RemoteToolInvocation`]. It is built before its session is
//! known and becomes usable once [`set_context`](RemoteToolWrapper::set_context)
//! has been called:
//!
//! ```text
//! Uninitialized ──set_context──> Ready(CallContext) ──set_context──> Ready(..)
//! ```
//!
//! Creating an invocation while `Uninitialized` fails with
//! [`BridgeError::ContextNotSet`].

use super::correlator::{CallCorrelator, DeliveryOutcome};
use super::invocation::RemoteToolInvocation;
use super::pending_store::PendingResultStore;
use super::route::DeliveryRoute;
use crate::config::BridgeParams;
use crate::error::BridgeError;
use crate::ports::call_journal::{CallJournal, NoCallJournal};
use crate::ports::event_publisher::EventPublisher;
use bridge_domain::{
    CallId, CallRecord, ParamValidator, SchemaParamValidator, SessionIds, ToolDescriptor, ToolResult,
};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Session channel plus the ids every published event carries.
#[derive(Clone)]
pub struct CallContext {
    pub publisher: Arc<dyn EventPublisher>,
    pub ids: SessionIds,
}

impl CallContext {
    pub fn new(
        publisher: Arc<dyn EventPublisher>,
        task_id: impl Into<String>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            publisher,
            ids: SessionIds::new(task_id, context_id),
        }
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext").field("ids", &self.ids).finish_non_exhaustive()
    }
}

enum WrapperState {
    Uninitialized,
    Ready(CallContext),
}

pub struct RemoteToolWrapper {
    descriptor: ToolDescriptor,
    params: BridgeParams,
    route: DeliveryRoute,
    validator: Arc<dyn ParamValidator + Send + Sync>,
    journal: Arc<dyn CallJournal>,
    state: RwLock<WrapperState>,
}

impl std::fmt::Debug for RemoteToolWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteToolWrapper")
            .field("tool", &self.descriptor.name)
            .field("delivery", &self.params.delivery)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

impl RemoteToolWrapper {
    /// Create a wrapper sharing the registry's correlator and store.
    pub fn new(
        descriptor: ToolDescriptor,
        params: BridgeParams,
        correlator: Arc<CallCorrelator>,
        store: Arc<PendingResultStore>,
    ) -> Self {
        if params.delivery.is_legacy_any() {
            warn!(
                "Tool {} uses legacy any-match delivery; only one call may be outstanding at a time",
                descriptor.name
            );
        }
        if !params.delivery.is_suspending() && store.policy() != params.delivery.store_policy() {
            warn!(
                "Tool {} expects a {} store but was given a {} store",
                descriptor.name,
                params.delivery.store_policy(),
                store.policy()
            );
        }
        Self {
            route: DeliveryRoute::new(params.delivery, correlator, store),
            descriptor,
            params,
            validator: Arc::new(SchemaParamValidator),
            journal: Arc::new(NoCallJournal),
            state: RwLock::new(WrapperState::Uninitialized),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ParamValidator + Send + Sync>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_journal(mut self, journal: Arc<dyn CallJournal>) -> Self {
        self.journal = journal;
        self
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn params(&self) -> &BridgeParams {
        &self.params
    }

    pub fn route(&self) -> &DeliveryRoute {
        &self.route
    }

    /// Bind (or rebind) the wrapper to a session.
    pub fn set_context(
        &self,
        publisher: Arc<dyn EventPublisher>,
        task_id: impl Into<String>,
        context_id: impl Into<String>,
    ) {
        self.set_call_context(CallContext::new(publisher, task_id, context_id));
    }

    pub fn set_call_context(&self, context: CallContext) {
        debug!("Tool {} bound to {:?}", self.descriptor.name, context.ids);
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = WrapperState::Ready(context);
    }

    pub fn is_ready(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner()),
            WrapperState::Ready(_)
        )
    }

    fn context(&self) -> Result<CallContext, BridgeError> {
        match &*self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner()) {
            WrapperState::Ready(context) => Ok(context.clone()),
            WrapperState::Uninitialized => Err(BridgeError::ContextNotSet(self.descriptor.name.clone())),
        }
    }

    /// Create an invocation with a freshly generated call id.
    pub fn create_invocation(&self, params: serde_json::Value) -> Result<RemoteToolInvocation, BridgeError> {
        self.create_invocation_with_id(CallId::generate(), params)
    }

    /// Create an invocation under a caller-chosen call id.
    pub fn create_invocation_with_id(
        &self,
        call_id: CallId,
        params: serde_json::Value,
    ) -> Result<RemoteToolInvocation, BridgeError> {
        let context = self.context()?;

        self.validator
            .validate(&params, &self.descriptor)
            .map_err(|message| BridgeError::InvalidParams {
                tool: self.descriptor.name.clone(),
                message,
            })?;

        let record = CallRecord::new(call_id, self.descriptor.name.clone(), params);
        debug!("Created invocation {} for tool {}", record.call_id, self.descriptor.name);

        if self.params.delivery.is_suspending() {
            RemoteToolInvocation::suspending(
                record.with_deadline_ms(self.params.timeout_ms()),
                context,
                Arc::clone(self.route.correlator()),
                self.params.timeout,
                self.params.emit_legacy_keys,
                Arc::clone(&self.journal),
            )
        } else {
            RemoteToolInvocation::immediate(
                record,
                context,
                Arc::clone(self.route.store()),
                Arc::clone(&self.journal),
            )
        }
    }

    /// Post a result from the remote-delivery path.
    pub fn save_tool_result(&self, call_id: &CallId, result: ToolResult) -> DeliveryOutcome {
        self.route.result(call_id, result)
    }

    /// Settle an outstanding call with a success result.
    pub fn handle_tool_result(&self, call_id: &CallId, result: ToolResult) -> DeliveryOutcome {
        self.route.result(call_id, result)
    }

    /// Settle an outstanding call with a remote error.
    pub fn handle_tool_error(&self, call_id: &CallId, message: impl Into<String>) -> DeliveryOutcome {
        self.route.error(call_id, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeliveryMode, MatchPolicy};
    use crate::testing::{ClosedPublisher, RecordingJournal, RecordingPublisher};
    use bridge_domain::{CallRequest, ErrorCode, TaskState};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    fn read_remote() -> ToolDescriptor {
        ToolDescriptor::new("read_remote", "Read a file on the client").with_schema(json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"]
        }))
    }

    fn wrapper(params: BridgeParams) -> RemoteToolWrapper {
        let correlator = Arc::new(CallCorrelator::new());
        let store = Arc::new(PendingResultStore::new(params.delivery.store_policy()));
        RemoteToolWrapper::new(read_remote(), params, correlator, store)
    }

    fn ready(params: BridgeParams) -> (RemoteToolWrapper, Arc<RecordingPublisher>) {
        let wrapper = wrapper(params);
        let publisher = RecordingPublisher::new();
        wrapper.set_context(publisher.clone(), "task-1", "ctx-1");
        (wrapper, publisher)
    }

    fn immediate(policy: MatchPolicy) -> BridgeParams {
        BridgeParams::default().with_delivery(DeliveryMode::Immediate { policy })
    }

    fn abc123() -> CallId {
        CallId::new("abc123")
    }

    #[test]
    fn test_invocation_before_context_fails() {
        let wrapper = wrapper(BridgeParams::default());
        assert!(!wrapper.is_ready());

        let err = wrapper.create_invocation(json!({ "path": "/tmp/x" })).unwrap_err();
        assert_eq!(err, BridgeError::ContextNotSet("read_remote".into()));
        assert_eq!(err.code(), ErrorCode::Configuration);
    }

    #[test]
    fn test_debug_names_tool() {
        let (wrapper, _) = ready(BridgeParams::default());
        let debug = format!("{:?}", wrapper);
        assert!(debug.contains("read_remote"));
        assert!(debug.contains("ready: true"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (wrapper, _) = ready(BridgeParams::default());
        let err = wrapper.create_invocation(json!({})).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidParams { ref tool, .. } if tool == "read_remote"));
        assert_eq!(wrapper.route().correlator().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_delivery_before_execute_resolves() {
        let (wrapper, publisher) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        let outcome = wrapper.handle_tool_result(&abc123(), ToolResult::success("ok"));
        assert_eq!(outcome, DeliveryOutcome::Delivered);

        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result, ToolResult::success("ok"));
        assert_eq!(invocation.state().name(), "resolved");
        assert_eq!(invocation.record().result(), Some(&ToolResult::success("ok")));

        // The request was still published
        let events = publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status.state, TaskState::InputRequired);
    }

    #[tokio::test]
    async fn test_published_request_round_trips() {
        let (wrapper, publisher) = ready(BridgeParams::default().with_emit_legacy_keys(true));
        let params = json!({ "path": "/tmp/x", "nested": { "n": [1, 2, 3] } });
        let mut invocation = wrapper.create_invocation(params.clone()).unwrap();
        let call_id = invocation.call_id().clone();
        wrapper.handle_tool_result(&call_id, ToolResult::success("ok"));

        invocation.execute(CancellationToken::new()).await.unwrap();

        let event = &publisher.events()[0];
        assert_eq!(event.task_id, "task-1");
        assert_eq!(event.context_id, "ctx-1");
        let wire = serde_json::to_string(event).unwrap();
        let parsed: bridge_domain::StatusUpdateEvent = serde_json::from_str(&wire).unwrap();
        let request = CallRequest::from_event(&parsed).unwrap();
        assert_eq!(request, CallRequest::new(call_id, "read_remote", params));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_one_ms_before_deadline_wins() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            let result = invocation.execute(CancellationToken::new()).await;
            (result, invocation)
        });

        tokio::time::sleep(Duration::from_millis(59_999)).await;
        assert!(wrapper.handle_tool_result(&abc123(), ToolResult::success("ok")).is_delivered());

        let (result, invocation) = handle.await.unwrap();
        assert_eq!(result.unwrap().llm_content, "ok");
        assert!(started.elapsed() < Duration::from_millis(60_000));
        assert_eq!(invocation.state().name(), "resolved");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delivery_times_out_at_deadline() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        let started = Instant::now();
        let err = invocation.execute(CancellationToken::new()).await.unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(
            err,
            BridgeError::RemoteTimeout {
                call_id: abc123(),
                timeout_ms: 60_000
            }
        );
        assert!(elapsed >= Duration::from_millis(60_000));
        assert!(elapsed < Duration::from_millis(60_100));
        assert_eq!(invocation.state().name(), "timed_out");

        // A late delivery is a no-op
        assert_eq!(
            wrapper.handle_tool_result(&abc123(), ToolResult::success("late")),
            DeliveryOutcome::Unknown
        );
        assert_eq!(invocation.state().name(), "timed_out");
    }

    #[tokio::test]
    async fn test_settles_exactly_once() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        assert!(wrapper.handle_tool_result(&abc123(), ToolResult::success("first")).is_delivered());
        assert_eq!(wrapper.handle_tool_error(&abc123(), "second"), DeliveryOutcome::Unknown);
        assert_eq!(
            wrapper.handle_tool_result(&abc123(), ToolResult::success("third")),
            DeliveryOutcome::Unknown
        );

        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result.llm_content, "first");

        let again = invocation.execute(CancellationToken::new()).await.unwrap_err();
        assert_eq!(again, BridgeError::AlreadyExecuted(abc123()));
        assert_eq!(invocation.state().name(), "resolved");
    }

    #[tokio::test]
    async fn test_remote_error_surfaces_verbatim() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        wrapper.handle_tool_error(&abc123(), "ENOENT: /tmp/x");

        let err = invocation.execute(CancellationToken::new()).await.unwrap_err();
        assert_eq!(
            err,
            BridgeError::RemoteDelivery {
                call_id: abc123(),
                message: "ENOENT: /tmp/x".into()
            }
        );
        assert_eq!(err.to_tool_result().llm_content, "ENOENT: /tmp/x");
        assert_eq!(invocation.state().name(), "failed");
    }

    #[tokio::test]
    async fn test_unknown_id_does_not_disturb_outstanding_call() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        assert_eq!(
            wrapper.handle_tool_result(&CallId::new("zzz"), ToolResult::success("stray")),
            DeliveryOutcome::Unknown
        );
        assert_eq!(wrapper.route().correlator().outstanding(), 1);

        wrapper.handle_tool_result(&abc123(), ToolResult::success("mine"));
        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result.llm_content, "mine");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_settles_as_cancelled() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            let result = invocation.execute(child).await;
            (result, invocation)
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        let (result, invocation) = handle.await.unwrap();
        assert_eq!(result.unwrap_err(), BridgeError::Cancelled(abc123()));
        assert_eq!(invocation.state().name(), "cancelled");
        assert_eq!(wrapper.route().correlator().outstanding(), 0);
        assert_eq!(
            wrapper.handle_tool_result(&abc123(), ToolResult::success("late")),
            DeliveryOutcome::Unknown
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_execute_skips_publish() {
        let (wrapper, publisher) = ready(BridgeParams::default());
        let mut invocation = wrapper.create_invocation(json!({ "path": "/tmp/x" })).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let err = invocation.execute(token).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cancelled);
        assert!(publisher.events().is_empty());
        assert_eq!(wrapper.route().correlator().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_publish_failure_fails_call() {
        let wrapper = wrapper(BridgeParams::default());
        wrapper.set_context(Arc::new(ClosedPublisher), "task-1", "ctx-1");
        let mut invocation = wrapper.create_invocation(json!({ "path": "/tmp/x" })).unwrap();

        let err = invocation.execute(CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PublishFailed);
        assert_eq!(invocation.state().name(), "failed");
        assert_eq!(wrapper.route().correlator().outstanding(), 0);
    }

    #[test]
    fn test_dropped_invocation_releases_waiter() {
        let (wrapper, _) = ready(BridgeParams::default());
        let invocation = wrapper.create_invocation(json!({ "path": "/tmp/x" })).unwrap();
        assert_eq!(wrapper.route().correlator().outstanding(), 1);

        drop(invocation);
        assert_eq!(wrapper.route().correlator().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_call_id_rejected() {
        let (wrapper, _) = ready(BridgeParams::default());
        let mut first = wrapper
            .create_invocation_with_id(CallId::new("dup"), json!({ "path": "/tmp/x" }))
            .unwrap();

        let err = wrapper
            .create_invocation_with_id(CallId::new("dup"), json!({ "path": "/tmp/y" }))
            .unwrap_err();
        assert_eq!(err, BridgeError::DuplicateCallId(CallId::new("dup")));
        assert_eq!(err.code(), ErrorCode::InvalidParams);

        // The first invocation still owns the waiter
        assert!(wrapper.handle_tool_result(&CallId::new("dup"), ToolResult::success("ok")).is_delivered());
        let result = first.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result.llm_content, "ok");
    }

    #[test]
    fn test_immediate_duplicate_call_id_rejected() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Exact));
        let _first = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        let err = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap_err();
        assert_eq!(err, BridgeError::DuplicateCallId(abc123()));
        assert!(wrapper.route().store().is_expected(&abc123()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_delivery_racing_deadline_is_never_lost() {
        let (wrapper, _) = ready(BridgeParams::default().with_timeout(Duration::from_millis(1)));
        let wrapper = Arc::new(wrapper);

        for round in 0..200 {
            let call_id = CallId::new(format!("race-{}", round));
            let mut invocation = wrapper
                .create_invocation_with_id(call_id.clone(), json!({ "path": "/tmp/x" }))
                .unwrap();

            let deliverer = Arc::clone(&wrapper);
            let delivery = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                deliverer.handle_tool_result(&call_id, ToolResult::success("ok"))
            });

            let result = invocation.execute(CancellationToken::new()).await;
            let outcome = delivery.await.unwrap();

            // A delivery reported as delivered must be the call's result
            match result {
                Ok(result) => {
                    assert_eq!(result.llm_content, "ok");
                    assert!(outcome.is_delivered());
                }
                Err(err) => {
                    assert!(matches!(err, BridgeError::RemoteTimeout { .. }), "round {}: {}", round, err);
                    assert_eq!(outcome, DeliveryOutcome::Unknown);
                }
            }
        }
        assert_eq!(wrapper.route().correlator().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_journal_records_lifecycle() {
        let journal = RecordingJournal::new();
        let (wrapper, _) = ready(BridgeParams::default());
        let wrapper = wrapper.with_journal(journal.clone());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        wrapper.handle_tool_result(&abc123(), ToolResult::success("ok"));
        invocation.execute(CancellationToken::new()).await.unwrap();

        assert_eq!(journal.types(), vec!["call_requested", "call_settled"]);
        let settled = journal.last("call_settled").unwrap();
        assert_eq!(settled["callId"], "abc123");
        assert_eq!(settled["state"], "resolved");
        assert!(settled["error"].is_null());
    }

    #[tokio::test]
    async fn test_context_can_be_replaced() {
        let (wrapper, first) = ready(BridgeParams::default());
        let second = RecordingPublisher::new();
        wrapper.set_context(second.clone(), "task-2", "ctx-2");

        let mut invocation = wrapper.create_invocation(json!({ "path": "/tmp/x" })).unwrap();
        let call_id = invocation.call_id().clone();
        wrapper.handle_tool_result(&call_id, ToolResult::success("ok"));
        invocation.execute(CancellationToken::new()).await.unwrap();

        assert!(first.events().is_empty());
        assert_eq!(second.events()[0].task_id, "task-2");
    }

    // ==================== Immediate mode ====================

    #[tokio::test]
    async fn test_immediate_exact_reads_saved_result() {
        let (wrapper, publisher) = ready(immediate(MatchPolicy::Exact));
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        assert!(invocation.record().deadline_ms.is_none());

        assert!(wrapper.save_tool_result(&abc123(), ToolResult::success("ok")).is_delivered());
        let result = invocation.execute(CancellationToken::new()).await.unwrap();

        assert_eq!(result.llm_content, "ok");
        assert!(publisher.events().is_empty());
        assert_eq!(invocation.state().name(), "resolved");
    }

    #[tokio::test]
    async fn test_immediate_missing_result_is_failure_result() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Exact));
        let mut invocation = wrapper.create_invocation(json!({ "path": "/tmp/x" })).unwrap();

        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, ErrorCode::MissingResult);
        assert_eq!(invocation.state().name(), "failed");
    }

    #[tokio::test]
    async fn test_immediate_result_posted_before_invocation() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Exact));

        assert!(wrapper.save_tool_result(&abc123(), ToolResult::success("early")).is_delivered());
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result, ToolResult::success("early"));
        assert_eq!(invocation.state().name(), "resolved");
    }

    #[tokio::test]
    async fn test_immediate_exact_other_id_not_consumed() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Exact));
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();

        assert!(wrapper.save_tool_result(&CallId::new("zzz"), ToolResult::success("stray")).is_delivered());
        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result.error().unwrap().code, ErrorCode::MissingResult);
        assert_eq!(wrapper.route().store().len(), 1);
    }

    #[tokio::test]
    async fn test_immediate_consumed_id_drops_late_result() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Any));
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        wrapper.save_tool_result(&abc123(), ToolResult::success("mine"));

        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result.llm_content, "mine");
        assert_eq!(
            wrapper.save_tool_result(&abc123(), ToolResult::success("again")),
            DeliveryOutcome::Unknown
        );
        assert!(wrapper.route().store().is_empty());
    }

    #[tokio::test]
    async fn test_immediate_remote_error_is_failure_result() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Exact));
        let mut invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        wrapper.handle_tool_error(&abc123(), "disk full");

        let result = invocation.execute(CancellationToken::new()).await.unwrap();
        assert_eq!(result.llm_content, "disk full");
        assert_eq!(result.error().unwrap().code, ErrorCode::RemoteDelivery);
        assert_eq!(invocation.state().name(), "failed");
    }

    #[test]
    fn test_dropped_immediate_invocation_forgets_id() {
        let (wrapper, _) = ready(immediate(MatchPolicy::Exact));
        let invocation = wrapper
            .create_invocation_with_id(abc123(), json!({ "path": "/tmp/x" }))
            .unwrap();
        assert!(wrapper.route().store().is_expected(&abc123()));

        drop(invocation);
        assert!(!wrapper.route().store().is_expected(&abc123()));
    }
}

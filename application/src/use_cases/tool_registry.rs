//! Tool registry: every tool one session can call.
//!
//! Owns the correlator and pending-result store shared by all remote tools,
//! the remote wrappers by name, and the ask-user tool. Deliveries from the
//! remote actor are routed by call id alone, so they do not need to name
//! the tool they belong to.

use crate::ask_user::{ASK_USER_TOOL_NAME, AskUserTool};
use crate::config::BridgeParams;
use crate::error::BridgeError;
use crate::ports::call_journal::{CallJournal, JournalEvent, NoCallJournal};
use crate::ports::event_publisher::EventPublisher;
use crate::remote::{
    CallContext, CallCorrelator, DeliveryOutcome, DeliveryRoute, PendingResultStore, RemoteToolWrapper,
};
use bridge_domain::{
    DeliveryPayload, DomainError, RemoteDelivery, ToolCatalog, ToolDescriptor, parse_custom_tools,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

pub struct ToolRegistry {
    params: BridgeParams,
    route: DeliveryRoute,
    remote: RwLock<BTreeMap<String, Arc<RemoteToolWrapper>>>,
    ask_user: AskUserTool,
    context: RwLock<Option<CallContext>>,
    journal: Arc<dyn CallJournal>,
}

impl ToolRegistry {
    pub fn new(params: BridgeParams) -> Self {
        let correlator = Arc::new(CallCorrelator::new());
        let store = Arc::new(PendingResultStore::new(params.delivery.store_policy()));
        Self {
            route: DeliveryRoute::new(params.delivery, correlator, store),
            params,
            remote: RwLock::new(BTreeMap::new()),
            ask_user: AskUserTool::new(),
            context: RwLock::new(None),
            journal: Arc::new(NoCallJournal),
        }
    }

    /// Journal used by the registry and every wrapper registered afterwards.
    pub fn with_journal(mut self, journal: Arc<dyn CallJournal>) -> Self {
        self.journal = journal;
        self
    }

    pub fn params(&self) -> &BridgeParams {
        &self.params
    }

    pub fn route(&self) -> &DeliveryRoute {
        &self.route
    }

    pub fn journal(&self) -> &Arc<dyn CallJournal> {
        &self.journal
    }

    pub fn ask_user(&self) -> &AskUserTool {
        &self.ask_user
    }

    /// Register a remote tool, replacing one with the same name.
    ///
    /// The new wrapper inherits the current session context, if any.
    pub fn register_remote(&self, descriptor: ToolDescriptor) -> Result<Arc<RemoteToolWrapper>, BridgeError> {
        if descriptor.name == ASK_USER_TOOL_NAME {
            return Err(DomainError::InvalidToolDeclaration {
                name: descriptor.name,
                reason: "name is reserved for the built-in ask-user tool".to_string(),
            }
            .into());
        }

        let name = descriptor.name.clone();
        let wrapper = RemoteToolWrapper::new(
            descriptor,
            self.params.clone(),
            Arc::clone(self.route.correlator()),
            Arc::clone(self.route.store()),
        )
        .with_journal(Arc::clone(&self.journal));

        if let Some(context) = self.current_context() {
            wrapper.set_call_context(context);
        }

        let wrapper = Arc::new(wrapper);
        let replaced = self
            .remote
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.clone(), Arc::clone(&wrapper));

        if replaced.is_some() {
            warn!("Remote tool {} re-registered; replacing previous declaration", name);
        } else {
            info!("Registered remote tool {}", name);
        }
        Ok(wrapper)
    }

    /// Register the tools a remote actor declared under `custom_tools`.
    ///
    /// Returns the registered names. Nothing is registered if any
    /// declaration is invalid.
    pub fn register_custom_tools(&self, metadata: &serde_json::Value) -> Result<Vec<String>, BridgeError> {
        let descriptors = parse_custom_tools(metadata)?;
        if let Some(reserved) = descriptors.iter().find(|d| d.name == ASK_USER_TOOL_NAME) {
            return Err(DomainError::InvalidToolDeclaration {
                name: reserved.name.clone(),
                reason: "name is reserved for the built-in ask-user tool".to_string(),
            }
            .into());
        }

        let mut names = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            names.push(self.register_remote(descriptor)?.name().to_string());
        }
        debug!("Registered {} custom tool(s)", names.len());
        Ok(names)
    }

    /// Bind every tool, present and future, to a session.
    pub fn set_context(
        &self,
        publisher: Arc<dyn EventPublisher>,
        task_id: impl Into<String>,
        context_id: impl Into<String>,
    ) {
        let context = CallContext::new(publisher, task_id, context_id);
        for wrapper in self.remote_tools() {
            wrapper.set_call_context(context.clone());
        }
        info!("Session context set: {:?}", context.ids);
        *self.context.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(context);
    }

    fn current_context(&self) -> Option<CallContext> {
        self.context
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn has_context(&self) -> bool {
        self.current_context().is_some()
    }

    pub fn remote(&self, name: &str) -> Option<Arc<RemoteToolWrapper>> {
        self.remote
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    pub fn remote_tools(&self) -> Vec<Arc<RemoteToolWrapper>> {
        self.remote
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// Route a result or error from the remote actor to its call.
    ///
    /// Unknown call ids are journaled and dropped.
    pub fn deliver(&self, delivery: RemoteDelivery) -> DeliveryOutcome {
        let outcome = match delivery.payload {
            DeliveryPayload::Result(result) => self.route.result(&delivery.call_id, result),
            DeliveryPayload::Error(message) => self.route.error(&delivery.call_id, message),
        };
        if outcome == DeliveryOutcome::Unknown {
            self.journal.record(JournalEvent::new(
                "delivery_dropped",
                json!({ "callId": delivery.call_id }),
            ));
        }
        outcome
    }

    /// Descriptors of every registered tool, ask-user included.
    pub fn catalog(&self) -> ToolCatalog {
        let mut catalog = ToolCatalog::new().register(self.ask_user.descriptor().clone());
        for wrapper in self.remote_tools() {
            catalog.insert(wrapper.descriptor().clone());
        }
        catalog
    }
}

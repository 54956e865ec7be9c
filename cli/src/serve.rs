//! JSON-lines host loop behind `tool-bridge serve`.
//!
//! Reads [`HostCommand`]s line by line and answers with [`HostOutput`]s.
//! Tool calls run as their own tasks so a suspended remote call never
//! blocks the deliveries that will eventually settle it.

use bridge_application::{
    AutoDismissConfirmation, ConfirmationPort, ConfirmationResponse, ExecuteToolCallUseCase,
    ToolCallInput, ToolRegistry,
};
use bridge_domain::RemoteDelivery;
use bridge_infrastructure::{HostCommand, HostConfirmation, HostOutput, JsonLinesPublisher, JsonLinesWriter};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type InFlight = Arc<Mutex<HashMap<String, CancellationToken>>>;

pub struct HostSession {
    registry: Arc<ToolRegistry>,
    use_case: ExecuteToolCallUseCase,
    writer: JsonLinesWriter,
    dialogs: Option<Arc<HostConfirmation>>,
    in_flight: InFlight,
    tasks: JoinSet<()>,
}

impl HostSession {
    /// ask_user dialogs are forwarded to the host unless `auto_dismiss` is set.
    pub fn new(registry: Arc<ToolRegistry>, writer: JsonLinesWriter, auto_dismiss: bool) -> Self {
        let dialogs = (!auto_dismiss).then(|| Arc::new(HostConfirmation::new(writer.clone())));
        let confirmation: Arc<dyn ConfirmationPort> = match &dialogs {
            Some(dialogs) => dialogs.clone(),
            None => Arc::new(AutoDismissConfirmation),
        };

        Self {
            use_case: ExecuteToolCallUseCase::new(Arc::clone(&registry), confirmation),
            registry,
            writer,
            dialogs,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            tasks: JoinSet::new(),
        }
    }

    /// Serve until the reader reaches EOF, then cancel what is still running.
    pub async fn run<R>(mut self, reader: R) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match HostCommand::parse(line) {
                Ok(command) => self.handle(command).await,
                Err(e) => {
                    warn!("Unparseable host line: {}", e);
                    self.report(format!("invalid command: {}", e)).await;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn handle(&mut self, command: HostCommand) {
        match command {
            HostCommand::Context { task_id, context_id } => {
                let publisher = Arc::new(JsonLinesPublisher::new(self.writer.clone()));
                self.registry.set_context(publisher, task_id, context_id);
            }
            HostCommand::Tools { metadata } => match self.registry.register_custom_tools(&metadata) {
                Ok(names) => info!("Host declared tools: {}", names.join(", ")),
                Err(e) => self.report(format!("tool declaration rejected: {}", e)).await,
            },
            HostCommand::Call {
                id,
                tool,
                params,
                call_id,
            } => self.spawn_call(id, tool, params, call_id).await,
            HostCommand::Delivery { data } => match RemoteDelivery::from_data(&data) {
                Ok(delivery) => {
                    let call_id = delivery.call_id.clone();
                    if !self.registry.deliver(delivery).is_delivered() {
                        debug!("Delivery for {} had no waiting call", call_id);
                    }
                }
                Err(e) => self.report(format!("invalid delivery: {}", e)).await,
            },
            HostCommand::Cancel { id } => {
                let token = self
                    .in_flight
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .get(&id)
                    .cloned();
                match token {
                    Some(token) => token.cancel(),
                    None => self.report(format!("no call in flight with id {}", id)).await,
                }
            }
            HostCommand::Answer {
                dialog_id,
                outcome,
                answers,
            } => {
                let answered = match &self.dialogs {
                    Some(dialogs) => dialogs.answer(&dialog_id, ConfirmationResponse { outcome, answers }),
                    None => false,
                };
                if !answered {
                    self.report(format!("no open dialog with id {}", dialog_id)).await;
                }
            }
        }
    }

    async fn spawn_call(&mut self, id: String, tool: String, params: serde_json::Value, call_id: Option<String>) {
        let token = CancellationToken::new();
        let duplicate = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if in_flight.contains_key(&id) {
                true
            } else {
                in_flight.insert(id.clone(), token.clone());
                false
            }
        };
        if duplicate {
            self.report(format!("call id {} is already in flight", id)).await;
            return;
        }

        let mut input = ToolCallInput::new(tool, params);
        if let Some(call_id) = call_id {
            input = input.with_call_id(call_id);
        }

        let use_case = self.use_case.clone();
        let writer = self.writer.clone();
        let in_flight = Arc::clone(&self.in_flight);
        self.tasks.spawn(async move {
            let result = use_case.execute(input, token).await;
            in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .remove(&id);
            if let Err(e) = writer.send(&HostOutput::ToolResult { id, result }).await {
                warn!("Could not write tool result: {}", e);
            }
        });
    }

    async fn report(&self, message: String) {
        if let Err(e) = self.writer.send(&HostOutput::error(message)).await {
            warn!("Could not write error line: {}", e);
        }
    }

    async fn shutdown(mut self) {
        let tokens: Vec<_> = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect();
        if !tokens.is_empty() {
            info!("Host closed input; cancelling {} call(s)", tokens.len());
        }
        for token in tokens {
            token.cancel();
        }
        if let Some(dialogs) = &self.dialogs {
            dialogs.interrupt_all();
        }
        while self.tasks.join_next().await.is_some() {}
    }
}

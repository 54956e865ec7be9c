//! JSON-lines writer shared by every producer of host output.

use super::host_protocol::HostOutput;
use async_trait::async_trait;
use bridge_application::{EventPublisher, PublishError};
use bridge_domain::StatusUpdateEvent;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Serializes [`HostOutput`] lines onto one writer.
///
/// Cloning shares the writer; a line is always written and flushed whole,
/// so concurrent tool calls never interleave output.
#[derive(Clone)]
pub struct JsonLinesWriter {
    writer: Arc<Mutex<BufWriter<BoxedWriter>>>,
}

impl JsonLinesWriter {
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(BufWriter::new(Box::new(writer)))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }

    pub async fn send(&self, output: &HostOutput) -> Result<(), PublishError> {
        let mut line = serde_json::to_string(output).map_err(|e| PublishError::Encode(e.to_string()))?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| PublishError::Io(e.to_string()))?;
        writer.flush().await.map_err(|e| PublishError::Io(e.to_string()))
    }
}

/// [`EventPublisher`] that writes each status update as a host `event` line.
#[derive(Clone)]
pub struct JsonLinesPublisher {
    writer: JsonLinesWriter,
}

impl JsonLinesPublisher {
    pub fn new(writer: JsonLinesWriter) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl EventPublisher for JsonLinesPublisher {
    async fn publish(&self, event: StatusUpdateEvent) -> Result<(), PublishError> {
        self.writer.send(&HostOutput::Event { event }).await
    }
}

//! JSONL file writer for call lifecycle events.
//!
//! Every [`JournalEvent`] becomes one line: the payload object with `type`
//! and `timestamp` merged in. Non-object payloads are nested under `data`.

use bridge_application::{CallJournal, JournalEvent};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only JSONL call journal.
///
/// Lines are flushed as they are written so a crashed bridge still leaves a
/// readable transcript.
pub struct JsonlCallJournal {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlCallJournal {
    /// Open (or create) the journal at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; the bridge then runs
    /// without a journal.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create journal directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open journal {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_record(event: JournalEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        record.insert("type".to_string(), Value::String(event.event_type.to_string()));
        record.insert("timestamp".to_string(), Value::String(timestamp));
        Value::Object(record)
    }
}

impl CallJournal for JsonlCallJournal {
    fn record(&self, event: JournalEvent) {
        let Ok(line) = serde_json::to_string(&Self::to_record(event)) else {
            return;
        };

        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Journal write to {} failed: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlCallJournal {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

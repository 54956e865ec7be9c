//! Logging infrastructure: the structured call journal.
//!
//! Provides [`JsonlCallJournal`], an append-only JSONL writer that implements
//! the [`CallJournal`](bridge_application::CallJournal) port.

mod jsonl_journal;

pub use jsonl_journal::JsonlCallJournal;

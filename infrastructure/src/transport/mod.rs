//! Transports that carry status updates and host traffic.
//!
//! - [`channel`] publishes into an in-process tokio channel
//! - [`jsonl`] writes JSON lines to any async writer (stdout in `serve`)
//! - [`host_protocol`] defines the line format spoken with the host
//! - [`host_confirmation`] forwards ask-user dialogs to the host

pub mod channel;
pub mod host_confirmation;
pub mod host_protocol;
pub mod jsonl;

pub use channel::ChannelEventPublisher;
pub use host_confirmation::HostConfirmation;
pub use host_protocol::{HostCommand, HostOutput};
pub use jsonl::{JsonLinesPublisher, JsonLinesWriter};

//! Wire events exchanged with the remote actor.
//!
//! Outbound, the bridge publishes [`StatusUpdateEvent`]s onto the session
//! channel. A call request is a status update carrying a data part:
//!
//! ```json
//! {
//!   "kind": "status-update",
//!   "taskId": "task-1",
//!   "contextId": "ctx-1",
//!   "status": {
//!     "state": "input-required",
//!     "message": {
//!       "role": "agent",
//!       "messageId": "…",
//!       "parts": [
//!         { "kind": "text", "text": "Requesting remote tool get_local_weather" },
//!         { "kind": "data", "data": { "request": {
//!             "callId": "9f0c…", "toolName": "get_local_weather", "args": { "city": "Oslo" }
//!         } } }
//!       ]
//!     }
//!   },
//!   "final": false,
//!   "metadata": { "coderAgent": { "kind": "remote-tool-call" } }
//! }
//! ```
//!
//! Inbound, the remote actor answers with a [`RemoteDelivery`] data part, and
//! may declare its own tools through `custom_tools` message metadata.

pub mod call_request;
pub mod custom_tools;
pub mod delivery;
pub mod status_update;

pub use call_request::{CALL_REQUEST_KIND, CallRequest};
pub use custom_tools::parse_custom_tools;
pub use delivery::{DeliveryPayload, RemoteDelivery};
pub use status_update::{EventMessage, Part, StatusUpdateEvent, TaskState, TaskStatus};

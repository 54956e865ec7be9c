//! Call domain module: identity and lifecycle of a single remote call.
//!
//! - [`CallId`]: the token that correlates a request with its result
//! - [`CallRecord`]: per-call state machine (see [`CallState`])
//! - [`SessionIds`]: task and context identifiers of the current session

pub mod call_id;
pub mod record;
pub mod session;

pub use call_id::CallId;
pub use record::{CallRecord, CallState};
pub use session::SessionIds;

//! Remote tool execution.
//!
//! - [`RemoteToolWrapper`]: declares a remote tool and creates invocations
//! - [`RemoteToolInvocation`]: one call's state machine
//! - [`CallCorrelator`]: call id → waiter, for suspending invocations
//! - [`PendingResultStore`]: call id → parked result, for immediate invocations
//! - [`DeliveryRoute`]: sends remote results/errors to whichever of the two is in use

pub mod correlator;
pub mod invocation;
pub mod pending_store;
pub mod route;
pub mod wrapper;

pub use correlator::{CallCorrelator, DeliveryOutcome, Settlement};
pub use invocation::RemoteToolInvocation;
pub use pending_store::{PendingResultStore, StoreOutcome};
pub use route::DeliveryRoute;
pub use wrapper::{CallContext, RemoteToolWrapper};

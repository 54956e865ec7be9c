//! Application-level configuration.
//!
//! - [`BridgeParams`]: deadline, delivery mode and wire options for remote tools

pub mod bridge_params;

pub use bridge_params::{BridgeParams, DEFAULT_TIMEOUT, DeliveryMode, MatchPolicy};

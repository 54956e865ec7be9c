//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod call_journal;
pub mod confirmation;
pub mod event_publisher;

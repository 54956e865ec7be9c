//! Bridge parameters: delivery mode, deadline and wire options.
//!
//! [`BridgeParams`] groups the static parameters that control how remote
//! tool invocations wait for their results. These are application-layer
//! concerns; the config file section `[bridge]` maps onto them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for a suspended remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How the pending-result store matches a consumer to a stored result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Consume strictly by call id.
    #[default]
    Exact,
    /// Drain the oldest stored result regardless of its call id.
    ///
    /// Only correct while at most one call is outstanding per tool instance.
    /// Nothing enforces this; several outstanding calls under this policy is
    /// a precondition violation and results may be handed to the wrong call.
    Any,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            MatchPolicy::Exact => "exact",
            MatchPolicy::Any => "any",
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "any" => Ok(MatchPolicy::Any),
            other => Err(format!("Unknown match policy: {}", other)),
        }
    }
}

/// How an invocation obtains its result.
///
/// | Mode | Publishes request? | Waits? | Matching |
/// |------|-------------------|--------|----------|
/// | `Suspending` | Yes | Until result, error, deadline or cancel | Exact (correlator) |
/// | `Immediate` | No | No | Store, by `policy` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum DeliveryMode {
    #[default]
    Suspending,
    /// Reads whatever the pending-result store holds at execute time.
    /// `Immediate { policy: Any }` is the legacy single-slot mode.
    Immediate { policy: MatchPolicy },
}

impl DeliveryMode {
    pub fn is_suspending(&self) -> bool {
        matches!(self, DeliveryMode::Suspending)
    }

    /// Policy the shared pending-result store should be built with
    pub fn store_policy(&self) -> MatchPolicy {
        match self {
            DeliveryMode::Suspending => MatchPolicy::Exact,
            DeliveryMode::Immediate { policy } => *policy,
        }
    }

    pub fn is_legacy_any(&self) -> bool {
        matches!(
            self,
            DeliveryMode::Immediate {
                policy: MatchPolicy::Any
            }
        )
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Suspending => write!(f, "suspending"),
            DeliveryMode::Immediate { policy } => write!(f, "immediate ({})", policy),
        }
    }
}

/// Remote invocation control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeParams {
    /// Deadline for a suspended call.
    pub timeout: Duration,
    pub delivery: DeliveryMode,
    /// Also emit the deprecated `tool_name` key on call requests.
    pub emit_legacy_keys: bool,
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            delivery: DeliveryMode::Suspending,
            emit_legacy_keys: false,
        }
    }
}

impl BridgeParams {
    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_emit_legacy_keys(mut self, emit: bool) -> Self {
        self.emit_legacy_keys = emit;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

//! Bridge configuration from TOML (`[bridge]` section)
//!
//! ```toml
//! [bridge]
//! timeout_ms = 60000
//! delivery = "suspending"     # or "immediate"
//! match_policy = "exact"      # or "any" (immediate only)
//! emit_legacy_keys = false
//! ```

use super::ConfigValidationError;
use bridge_application::{BridgeParams, DeliveryMode, MatchPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBridgeConfig {
    /// Deadline for a suspended remote call, in milliseconds
    pub timeout_ms: u64,
    /// "suspending" or "immediate"
    pub delivery: String,
    /// "exact" or "any"
    pub match_policy: String,
    /// Also emit the deprecated `tool_name` key on call requests
    pub emit_legacy_keys: bool,
}

impl Default for FileBridgeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            delivery: "suspending".to_string(),
            match_policy: "exact".to_string(),
            emit_legacy_keys: false,
        }
    }
}

impl FileBridgeConfig {
    pub fn parse_match_policy(&self) -> Result<MatchPolicy, ConfigValidationError> {
        self.match_policy
            .parse()
            .map_err(|_| ConfigValidationError::UnknownMatchPolicy(self.match_policy.clone()))
    }

    pub fn parse_delivery(&self) -> Result<DeliveryMode, ConfigValidationError> {
        let policy = self.parse_match_policy()?;
        match self.delivery.to_lowercase().as_str() {
            "suspending" => {
                if policy == MatchPolicy::Any {
                    return Err(ConfigValidationError::SuspendingAnyMatch);
                }
                Ok(DeliveryMode::Suspending)
            }
            "immediate" => Ok(DeliveryMode::Immediate { policy }),
            _ => Err(ConfigValidationError::UnknownDelivery(self.delivery.clone())),
        }
    }

    pub fn to_bridge_params(&self) -> Result<BridgeParams, ConfigValidationError> {
        if self.timeout_ms == 0 {
            return Err(ConfigValidationError::ZeroTimeout);
        }
        Ok(BridgeParams::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_delivery(self.parse_delivery()?)
            .with_emit_legacy_keys(self.emit_legacy_keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_suspending_exact() {
        let params = FileBridgeConfig::default().to_bridge_params().unwrap();
        assert_eq!(params.timeout_ms(), 60_000);
        assert_eq!(params.delivery, DeliveryMode::Suspending);
    }

    #[test]
    fn test_immediate_any() {
        let config = FileBridgeConfig {
            delivery: "immediate".into(),
            match_policy: "any".into(),
            ..Default::default()
        };
        assert!(config.to_bridge_params().unwrap().delivery.is_legacy_any());
    }

    #[test]
    fn test_rejections() {
        let zero = FileBridgeConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(zero.to_bridge_params(), Err(ConfigValidationError::ZeroTimeout)));

        let suspending_any = FileBridgeConfig {
            match_policy: "any".into(),
            ..Default::default()
        };
        assert!(matches!(
            suspending_any.to_bridge_params(),
            Err(ConfigValidationError::SuspendingAnyMatch)
        ));

        let unknown = FileBridgeConfig {
            delivery: "eventually".into(),
            ..Default::default()
        };
        assert!(matches!(
            unknown.to_bridge_params(),
            Err(ConfigValidationError::UnknownDelivery(ref d)) if d == "eventually"
        ));
    }
}

//! Call identifier value object

use serde::{Deserialize, Serialize};

/// Unique token correlating a call request with its eventual result.
///
/// Generated locally as a UUID v4, but any string is accepted back from a
/// remote actor since it only ever echoes the token verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CallId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = CallId::generate();
        let b = CallId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_transparent_serde() {
        let id: CallId = "abc123".into();
        assert_eq!(serde_json::to_value(&id).unwrap(), "abc123");
        let back: CallId = serde_json::from_value(serde_json::json!("abc123")).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "abc123");
    }
}

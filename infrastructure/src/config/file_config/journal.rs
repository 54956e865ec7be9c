//! Call journal configuration from TOML (`[journal]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[journal]` section
///
/// ```toml
/// [journal]
/// path = "~/.local/share/tool-bridge/calls.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// JSONL file receiving call lifecycle events; disabled when unset
    pub path: Option<String>,
}

impl FileJournalConfig {
    /// The journal path with a leading `~` expanded
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let path = self.path.as_deref()?.trim();
        if path.is_empty() {
            return None;
        }
        match path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_path_disables_journal() {
        assert!(FileJournalConfig::default().resolved_path().is_none());
        let blank = FileJournalConfig {
            path: Some("  ".into()),
        };
        assert!(blank.resolved_path().is_none());
    }

    #[test]
    fn test_relative_path_kept() {
        let config = FileJournalConfig {
            path: Some("logs/calls.jsonl".into()),
        };
        assert_eq!(config.resolved_path(), Some(PathBuf::from("logs/calls.jsonl")));
    }
}

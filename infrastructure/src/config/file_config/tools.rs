//! Tools configuration from TOML (`[tools]` section)
//!
//! Remote tools can be declared ahead of time instead of (or as well as)
//! arriving through `custom_tools` metadata:
//!
//! ```toml
//! [tools.remote.get_local_weather]
//! description = "Get the local weather for a city"
//! display_name = "Local Weather"
//!
//! [tools.remote.get_local_weather.parameters]
//! type = "object"
//! required = ["city"]
//!
//! [tools.remote.get_local_weather.parameters.properties.city]
//! type = "string"
//! ```

use super::ConfigValidationError;
use bridge_application::ASK_USER_TOOL_NAME;
use bridge_domain::{ToolDescriptor, ToolKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Remote tools by name
    pub remote: BTreeMap<String, FileRemoteToolConfig>,
}

/// `[tools.remote.<name>]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRemoteToolConfig {
    pub description: String,
    pub display_name: Option<String>,
    /// "communicate" or "other"
    pub kind: Option<String>,
    /// JSON-schema object for the parameters
    pub parameters: Option<serde_json::Value>,
}

impl FileToolsConfig {
    /// Descriptors for every configured remote tool
    pub fn remote_descriptors(&self) -> Result<Vec<ToolDescriptor>, ConfigValidationError> {
        self.remote
            .iter()
            .map(|(name, tool)| tool.to_descriptor(name))
            .collect()
    }
}

impl FileRemoteToolConfig {
    pub fn to_descriptor(&self, name: &str) -> Result<ToolDescriptor, ConfigValidationError> {
        if name == ASK_USER_TOOL_NAME {
            return Err(ConfigValidationError::ReservedToolName(name.to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ConfigValidationError::MissingToolDescription(name.to_string()));
        }

        let mut descriptor = ToolDescriptor::new(name, self.description.clone());

        if let Some(kind) = &self.kind {
            let kind: ToolKind = kind.parse().map_err(|_| ConfigValidationError::UnknownToolKind {
                tool: name.to_string(),
                kind: kind.clone(),
            })?;
            descriptor = descriptor.with_kind(kind);
        }
        if let Some(display_name) = &self.display_name {
            descriptor = descriptor.with_display_name(display_name.clone());
        }
        if let Some(parameters) = &self.parameters {
            if !parameters.is_object() {
                return Err(ConfigValidationError::InvalidToolSchema(name.to_string()));
            }
            descriptor = descriptor.with_schema(parameters.clone());
        }

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_remote_tool() {
        let toml_str = r#"
[remote.get_local_weather]
description = "Get the local weather for a city"
display_name = "Local Weather"

[remote.get_local_weather.parameters]
type = "object"
required = ["city"]

[remote.get_local_weather.parameters.properties.city]
type = "string"
"#;
        let config: FileToolsConfig = toml::from_str(toml_str).unwrap();
        let tools = config.remote_descriptors().unwrap();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].display_name, "Local Weather");
        assert_eq!(tools[0].kind, ToolKind::Other);
        assert_eq!(tools[0].required_params(), vec!["city"]);
        assert_eq!(tools[0].parameter_schema["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_invalid_declarations() {
        let empty = FileRemoteToolConfig::default();
        assert!(matches!(
            empty.to_descriptor("x"),
            Err(ConfigValidationError::MissingToolDescription(_))
        ));

        let bad_kind = FileRemoteToolConfig {
            description: "d".into(),
            kind: Some("edit".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_kind.to_descriptor("x"),
            Err(ConfigValidationError::UnknownToolKind { .. })
        ));

        let reserved = FileRemoteToolConfig {
            description: "d".into(),
            ..Default::default()
        };
        assert!(matches!(
            reserved.to_descriptor("ask_user"),
            Err(ConfigValidationError::ReservedToolName(_))
        ));
    }
}

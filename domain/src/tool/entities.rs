//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse capability classification of a tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Tools that talk to a person (e.g. ask_user)
    Communicate,
    /// Everything else, including remote-delegated tools
    #[default]
    Other,
}

impl ToolKind {
    pub fn as_str(&self) -> &str {
        match self {
            ToolKind::Communicate => "communicate",
            ToolKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "communicate" => Ok(ToolKind::Communicate),
            "other" => Ok(ToolKind::Other),
            other => Err(format!("Unknown tool kind: {}", other)),
        }
    }
}

/// Immutable description of a tool, as declared to the reasoning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "get_local_weather")
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Free-text description shown to the engine
    pub description: String,
    /// JSON-schema object describing the parameters
    pub parameter_schema: serde_json::Value,
    /// Capability kind
    pub kind: ToolKind,
}

impl ToolDescriptor {
    /// Create a descriptor with an empty object schema.
    ///
    /// The display name defaults to the tool name.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            description: description.into(),
            parameter_schema: serde_json::json!({ "type": "object", "properties": {} }),
            kind: ToolKind::Other,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.parameter_schema = schema;
        self
    }

    pub fn with_kind(mut self, kind: ToolKind) -> Self {
        self.kind = kind;
        self
    }

    /// Names listed in the schema's `required` array
    pub fn required_params(&self) -> Vec<&str> {
        self.parameter_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Render as the function declaration handed to the reasoning engine
    pub fn to_api_tool(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameter_schema,
        })
    }
}

/// Descriptors of every tool known to a registry, ordered by name
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one with the same name
    pub fn register(mut self, tool: ToolDescriptor) -> Self {
        self.insert(tool);
        self
    }

    /// Insert in place; returns the replaced descriptor if any
    pub fn insert(&mut self, tool: ToolDescriptor) -> Option<ToolDescriptor> {
        self.tools.insert(tool.name.clone(), tool)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All descriptors rendered for the engine
    pub fn to_api_tools(&self) -> Vec<serde_json::Value> {
        self.tools.values().map(|t| t.to_api_tool()).collect()
    }
}

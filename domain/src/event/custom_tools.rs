//! Tools declared by the remote actor in message metadata

use crate::core::error::DomainError;
use crate::tool::entities::{ToolDescriptor, ToolKind};

/// Metadata key carrying the declarations
pub const CUSTOM_TOOLS_KEY: &str = "custom_tools";

/// Parse `{"custom_tools": {"<name>": {"description", "parameters", "displayName"?}}}`.
///
/// Returns an empty list when the key is absent. Declarations without a
/// description are rejected; a missing `parameters` means "no parameters".
pub fn parse_custom_tools(metadata: &serde_json::Value) -> Result<Vec<ToolDescriptor>, DomainError> {
    let Some(tools) = metadata.get(CUSTOM_TOOLS_KEY) else {
        return Ok(Vec::new());
    };
    let tools = tools.as_object().ok_or_else(|| {
        DomainError::MalformedEvent(format!("{} must be an object", CUSTOM_TOOLS_KEY))
    })?;

    let mut descriptors = Vec::with_capacity(tools.len());
    for (name, declaration) in tools {
        let invalid = |reason: &str| DomainError::InvalidToolDeclaration {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }

        let description = declaration
            .get("description")
            .and_then(|d| d.as_str())
            .ok_or_else(|| invalid("missing description"))?;

        let mut descriptor = ToolDescriptor::new(name.clone(), description).with_kind(ToolKind::Other);

        match declaration.get("parameters") {
            None | Some(serde_json::Value::Null) => {}
            Some(schema) if schema.is_object() => descriptor = descriptor.with_schema(schema.clone()),
            Some(_) => return Err(invalid("parameters must be a JSON-schema object")),
        }

        if let Some(display_name) = declaration.get("displayName").and_then(|d| d.as_str()) {
            descriptor = descriptor.with_display_name(display_name);
        }

        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

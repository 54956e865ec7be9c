//! Tool domain traits
//!
//! Contains the pure parameter-validation hook. Async execution lives in the
//! application layer.

use super::entities::ToolDescriptor;

/// Validator for tool call parameters
///
/// Pure domain trait: checks params against a descriptor's schema without I/O.
pub trait ParamValidator {
    /// Validate params against the descriptor; the error names the first violation
    fn validate(&self, params: &serde_json::Value, descriptor: &ToolDescriptor) -> Result<(), String>;
}

/// Shallow JSON-schema validator.
///
/// Checks that params are an object, that every `required` key is present and
/// that properties declaring a primitive `type` carry a value of that type.
/// Nested constraints (`maxLength`, `enum`, item counts) are left to the engine's
/// schema layer.
#[derive(Debug, Clone, Default)]
pub struct SchemaParamValidator;

impl ParamValidator for SchemaParamValidator {
    fn validate(&self, params: &serde_json::Value, descriptor: &ToolDescriptor) -> Result<(), String> {
        let Some(object) = params.as_object() else {
            return Err(format!(
                "Parameters for tool '{}' must be a JSON object",
                descriptor.name
            ));
        };

        for name in descriptor.required_params() {
            if !object.contains_key(name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    name, descriptor.name
                ));
            }
        }

        let Some(properties) = descriptor
            .parameter_schema
            .get("properties")
            .and_then(|p| p.as_object())
        else {
            return Ok(());
        };

        for (name, value) in object {
            let Some(expected) = properties
                .get(name)
                .and_then(|p| p.get("type"))
                .and_then(|t| t.as_str())
            else {
                continue;
            };
            if !matches_json_type(value, expected) {
                return Err(format!(
                    "Parameter '{}' for tool '{}' must be of type {}",
                    name, descriptor.name, expected
                ));
            }
        }

        Ok(())
    }
}

fn matches_json_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        // Unknown type keywords are not ours to reject
        _ => true,
    }
}

//! Tool-related types.

use super::{CallToolResult, Tool, ToolError};
use crate::model::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments for an MCP tool call: a JSON object, or nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(pub Option<Map<String, Value>>);

impl TryFrom<Value> for ToolArguments {
    type Error = ToolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self(None)),
            Value::Object(map) => Ok(Self(Some(map))),
            other => Err(ToolError::InvalidInput(format!(
                "tool arguments must be a JSON object, got {other}"
            ))),
        }
    }
}

/// What a tool call produced, already flattened to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
    /// The tool ran but reported failure.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl From<CallToolResult> for ToolOutput {
    fn from(result: CallToolResult) -> Self {
        let text = result
            .content
            .iter()
            .map(|content| match content.as_text() {
                Some(text) => text.text.clone(),
                None => serde_json::to_string(content).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            text,
            is_error: result.is_error.unwrap_or(false),
        }
    }
}

impl From<Tool> for ToolSpec {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool
                .description
                .map(|description| description.to_string())
                .unwrap_or_default(),
            schema: Value::Object(tool.input_schema.as_ref().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn arguments_accept_object_and_null() {
        let args = ToolArguments::try_from(json!({ "location_id": "QIM4" })).unwrap();
        assert_eq!(args.0.unwrap()["location_id"], "QIM4");

        assert_eq!(ToolArguments::try_from(Value::Null).unwrap(), ToolArguments(None));
    }

    #[test]
    fn arguments_reject_non_object() {
        let err = ToolArguments::try_from(json!(["QIM4"])).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn output_joins_text_contents() {
        let result = CallToolResult::success(vec![
            Content::text("Location Name: Manheim Mississippi"),
            Content::text("Time Zone: America/Chicago"),
        ]);
        let output = ToolOutput::from(result);
        assert_eq!(
            output.text,
            "Location Name: Manheim Mississippi\nTime Zone: America/Chicago"
        );
        assert!(!output.is_error);
    }

    #[test]
    fn output_keeps_error_flag() {
        let result = CallToolResult::error(vec![Content::text("upstream returned 503")]);
        let output = ToolOutput::from(result);
        assert_eq!(output, ToolOutput::error("upstream returned 503"));
    }

    #[test]
    fn spec_from_mcp_tool() {
        let schema = json!({
            "type": "object",
            "properties": { "state": { "type": "string" } },
            "required": ["state"]
        });
        let Value::Object(schema) = schema else {
            unreachable!()
        };
        let tool = Tool::new(
            "get_locations_by_state",
            "Get locations in a specific state.",
            Arc::new(schema),
        );

        let spec = ToolSpec::from(tool);
        assert_eq!(spec.name, "get_locations_by_state");
        assert_eq!(spec.description, "Get locations in a specific state.");
        assert_eq!(spec.schema["required"][0], "state");
    }
}

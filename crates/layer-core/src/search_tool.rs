use serde_json::json;

use crate::error::Result;
use crate::schema::Schema;
use crate::types::Tool;

pub const SEARCH_TOOL_NAME: &str = "search_workflows_and_docs";

const SEARCH_TOOL_DESCRIPTION: &str = "ALWAYS EXECUTE THIS TOOL FIRST UNLESS THE TOOL TO BE USED IS OBVIOUS. \
It will return relevant workflows and documentation based on the user's query.";

/// The built-in tool backed by `POST /chat/search`.
///
/// Its input is the chat transcript so far, in OpenAI message format.
pub fn search_tool() -> Result<Tool> {
    let input_schema = Schema::from_value(json!({
        "$defs": {
            "FunctionCall": {
                "properties": {
                    "arguments": { "title": "Arguments", "type": "string" },
                    "name": { "title": "Name", "type": "string" }
                },
                "required": ["name", "arguments"],
                "title": "FunctionCall",
                "type": "object"
            },
            "Message": {
                "properties": {
                    "content": {
                        "anyOf": [{ "type": "string" }, { "type": "null" }],
                        "title": "Content"
                    },
                    "role": { "$ref": "#/$defs/MessageRole" },
                    "tool_calls": {
                        "anyOf": [
                            {
                                "items": { "$ref": "#/$defs/schemas__tools__openai__ToolCall" },
                                "type": "array"
                            },
                            { "type": "null" }
                        ],
                        "title": "Tool Calls"
                    }
                },
                "required": ["role"],
                "title": "Message",
                "type": "object"
            },
            "MessageRole": {
                "enum": ["assistant", "user", "system", "tool"],
                "title": "MessageRole",
                "type": "string"
            },
            "schemas__tools__openai__ToolCall": {
                "properties": {
                    "function": { "$ref": "#/$defs/FunctionCall" },
                    "id": { "title": "Id", "type": "string" },
                    "type": {
                        "const": "function",
                        "default": "function",
                        "enum": ["function"],
                        "title": "type",
                        "type": "string"
                    }
                },
                "required": ["id", "function"],
                "title": "ToolCall",
                "type": "object"
            },
            "ToolMessage": {
                "properties": {
                    "content": { "title": "Content", "type": "string" },
                    "role": {
                        "const": "tool",
                        "default": "tool",
                        "enum": ["tool"],
                        "title": "Role",
                        "type": "string"
                    },
                    "tool_call_id": { "title": "Tool Call Id", "type": "string" }
                },
                "required": ["content", "tool_call_id"],
                "title": "ToolMessage",
                "type": "object"
            }
        },
        "additionalProperties": false,
        "properties": {
            "body": {
                "properties": {
                    "messages": {
                        "items": {
                            "anyOf": [
                                { "$ref": "#/$defs/Message" },
                                { "$ref": "#/$defs/ToolMessage" }
                            ]
                        },
                        "title": "Messages",
                        "type": "array"
                    }
                },
                "required": ["messages"],
                "title": "Body",
                "type": "object"
            }
        },
        "required": ["body"],
        "type": "object"
    }))?;

    Ok(Tool {
        name: SEARCH_TOOL_NAME.to_string(),
        description: Some(SEARCH_TOOL_DESCRIPTION.to_string()),
        input_schema,
        url: None,
    })
}

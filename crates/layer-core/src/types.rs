use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{LayerError, Result};
use crate::schema::Schema;

/// Which Layer deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerEnvironment {
    /// A locally running API on `http://localhost`.
    Development,
    Staging,
    /// The public API. **Default.**
    #[default]
    Production,
}

impl LayerEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost",
            Self::Staging => "https://api.staging.buildwithlayer.com",
            Self::Production => "https://api.buildwithlayer.com",
        }
    }
}

impl std::fmt::Display for LayerEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for LayerEnvironment {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// A tool as served by the Layer API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Tool {
    /// Parse one tool record from the remote catalog.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| LayerError::InvalidSchema(e.to_string()))
    }

    /// Render the tool in the shape MCP `tools/list` expects.
    ///
    /// The input schema must be an object schema with `type: "object"`.
    /// Fields MCP does not know about (`url`) are dropped.
    pub fn to_listing(&self) -> Result<Value> {
        let is_object = self
            .input_schema
            .as_object()
            .is_some_and(|obj| obj.is_type("object"));
        if !is_object {
            return Err(LayerError::InvalidSchema(format!(
                "tool '{}': inputSchema must have type \"object\"",
                self.name
            )));
        }

        let mut listing = json!({
            "name": self.name,
            "inputSchema": self.input_schema.to_value()?,
        });
        if let Some(description) = &self.description {
            listing["description"] = Value::String(description.clone());
        }
        Ok(listing)
    }
}

/// A single hit from the workflow/documentation search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Result of `tools/call`: a content array plus the `isError` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl CallToolResult {
    pub fn texts(texts: impl IntoIterator<Item = String>) -> Self {
        Self {
            content: texts.into_iter().map(|text| ToolContent::Text { text }).collect(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_environment() {
        assert_eq!("staging".parse::<LayerEnvironment>().unwrap(), LayerEnvironment::Staging);
        assert_eq!(
            "Development".parse::<LayerEnvironment>().unwrap(),
            LayerEnvironment::Development
        );
        assert!("qa".parse::<LayerEnvironment>().is_err());
        assert_eq!(LayerEnvironment::default(), LayerEnvironment::Production);
        assert_eq!(
            LayerEnvironment::Production.base_url(),
            "https://api.buildwithlayer.com"
        );
    }

    #[test]
    fn listing_drops_url_and_requires_object_schema() {
        let tool = Tool::from_value(json!({
            "name": "create_check",
            "description": "Create a check",
            "inputSchema": { "type": "object", "properties": {} },
            "url": "https://example.com/checks"
        }))
        .unwrap();
        assert_eq!(
            tool.to_listing().unwrap(),
            json!({
                "name": "create_check",
                "description": "Create a check",
                "inputSchema": { "type": "object", "properties": {} }
            })
        );

        let bad = Tool::from_value(json!({ "name": "x", "inputSchema": { "type": "string" } })).unwrap();
        assert!(bad.to_listing().is_err());

        let boolean = Tool::from_value(json!({ "name": "y", "inputSchema": true })).unwrap();
        assert!(boolean.to_listing().is_err());
    }

    #[test]
    fn tool_record_without_schema_is_rejected() {
        assert!(Tool::from_value(json!({ "name": "broken" })).is_err());
    }

    #[test]
    fn call_result_wire_shape() {
        let ok = CallToolResult::texts(vec!["{}".to_string()]);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "content": [{ "type": "text", "text": "{}" }], "isError": false })
        );

        let err = CallToolResult::error("boom");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "content": [{ "type": "text", "text": "boom" }], "isError": true })
        );
    }
}

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::arguments::prepare_arguments;
use crate::config::LayerConfig;
use crate::defaults::{apply_defaults, Overrides};
use crate::error::{LayerError, Result};
use crate::search_tool::{search_tool, SEARCH_TOOL_NAME};
use crate::types::{CallToolResult, SearchResult, Tool};

const API_KEY_HEADER: &str = "Layer-Api-Key";

#[derive(Deserialize)]
struct SearchResponse {
    sources: Vec<SearchResult>,
}

/// Client for the Layer API.
///
/// Holds the tool catalog from the most recent [`LayerApi::list_tools`];
/// only tools in that catalog can be called.
pub struct LayerApi {
    client: reqwest::Client,
    config: LayerConfig,
    overrides: Overrides,
    tools: Vec<Tool>,
}

impl LayerApi {
    pub fn new(config: LayerConfig, overrides: Overrides) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            overrides,
            tools: Vec::new(),
        })
    }

    /// Tools published by the last listing.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Fetch the remote catalog and return it in MCP `tools/list` shape.
    ///
    /// The search tool always comes first. Overrides are injected into every
    /// input schema. A tool whose record or schema is malformed is skipped
    /// and does not fail the listing.
    pub async fn list_tools(&mut self) -> Result<Vec<Value>> {
        let records: Vec<Value> = self.get_json("/mcp/tools").await?;

        let mut tools = vec![search_tool()?];
        for record in records {
            match Tool::from_value(record) {
                Ok(tool) => tools.push(tool),
                Err(e) => warn!(error = %e, "skipping malformed tool record"),
            }
        }

        let mut published = Vec::with_capacity(tools.len());
        let mut listing = Vec::with_capacity(tools.len());
        for mut tool in tools {
            apply_defaults(&mut tool.input_schema, &self.overrides, None);
            match tool.to_listing() {
                Ok(entry) => {
                    listing.push(entry);
                    published.push(tool);
                }
                Err(e) => warn!(tool = %tool.name, error = %e, "skipping tool"),
            }
        }

        info!(count = published.len(), "loaded tool catalog");
        self.tools = published;
        Ok(listing)
    }

    /// Call a listed tool.
    ///
    /// Unknown tools and invalid arguments are errors. Failures of the
    /// forwarded HTTP call are reported in-band with `isError: true`.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> Result<CallToolResult> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| LayerError::ToolNotAvailable {
                name: name.to_string(),
            })?;

        let arguments = prepare_arguments(tool, arguments)?;
        debug!(tool = %name, "calling tool");

        if tool.name == SEARCH_TOOL_NAME {
            return match self.search(&arguments).await {
                Ok(sources) => {
                    let texts = sources
                        .iter()
                        .map(serde_json::to_string)
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    Ok(CallToolResult::texts(texts))
                }
                Err(e) => {
                    warn!(tool = %name, error = %e, "search failed");
                    Ok(CallToolResult::error(e.to_string()))
                }
            };
        }

        match self.post_json::<Value>("/mcp/tools/call", &arguments, false).await {
            Ok(response) => Ok(CallToolResult::texts([response.to_string()])),
            Err(e) => {
                warn!(tool = %name, error = %e, "tool call failed");
                Ok(CallToolResult::error(e.to_string()))
            }
        }
    }

    async fn search(&self, arguments: &Value) -> Result<Vec<SearchResult>> {
        let response: SearchResponse = self.post_json("/chat/search", arguments, true).await?;
        Ok(response.sources)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        decode(resp).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
        accept_json: bool,
    ) -> Result<T> {
        let mut request = self
            .client
            .post(self.url(path))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body);
        if accept_json {
            request = request.header(ACCEPT, "application/json");
        }
        decode(request.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(LayerError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.json().await?)
}

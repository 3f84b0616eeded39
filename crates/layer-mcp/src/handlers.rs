use layer_core::LayerApi;
use serde_json::{json, Value};
use tracing::warn;

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Route one request. Notifications (no id) get no response.
pub async fn dispatch(request: JsonRpcRequest, api: &mut LayerApi) -> Option<JsonRpcResponse> {
    if request.id.is_none() {
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request.id),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(request.id, api).await,
        "tools/call" => handle_tools_call(request.id, &request.params, api).await,
        _ => JsonRpcResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("method not found: {}", request.method),
        ),
    };
    Some(response)
}

fn handle_initialize(id: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        }),
    )
}

async fn handle_tools_list(id: Option<Value>, api: &mut LayerApi) -> JsonRpcResponse {
    match api.list_tools().await {
        Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
        Err(e) => {
            warn!(error = %e, "failed to list tools");
            JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string())
        }
    }
}

async fn handle_tools_call(id: Option<Value>, params: &Value, api: &mut LayerApi) -> JsonRpcResponse {
    let tool_name = match params.get("name").and_then(|v| v.as_str()) {
        Some(name) => name,
        None => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "missing tool name");
        }
    };

    let arguments = params.get("arguments").filter(|v| !v.is_null()).cloned();

    match api.call_tool(tool_name, arguments).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        },
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
    }
}

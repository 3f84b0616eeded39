use layer_core::LayerApi;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::handlers;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};

/// Serve newline-delimited JSON-RPC until `reader` hits EOF.
///
/// Requests are handled one at a time in arrival order.
pub async fn serve<R, W>(reader: R, mut writer: W, mut api: LayerApi) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                let resp = JsonRpcResponse::error(None, PARSE_ERROR, format!("parse error: {e}"));
                send_response(&mut writer, &resp).await?;
                continue;
            }
        };

        debug!(method = %request.method, "received request");

        if let Some(response) = handlers::dispatch(request, &mut api).await {
            send_response(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn send_response<W>(writer: &mut W, response: &JsonRpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut json = serde_json::to_string(response)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_core::{LayerConfig, Overrides};
    use mockito::Server;
    use serde_json::{json, Value};
    use tokio::io::BufReader;

    fn api(base_url: String, overrides: Overrides) -> LayerApi {
        let config = LayerConfig::builder("test-key")
            .base_url(Some(base_url))
            .build()
            .unwrap();
        LayerApi::new(config, overrides).unwrap()
    }

    async fn run(input: &str, api: LayerApi) -> Vec<Value> {
        let mut output = Vec::new();
        serve(BufReader::new(input.as_bytes()), &mut output, api)
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn handshake_ping_and_errors() {
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "not json",
            r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_checks"}}"#,
            r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#,
        ]
        .join("\n");

        let responses = run(&input, api("http://127.0.0.1:9".into(), Overrides::new())).await;
        assert_eq!(responses.len(), 7);

        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "layer-mcp");

        assert_eq!(responses[1], json!({ "jsonrpc": "2.0", "id": 2, "result": {} }));

        assert!(responses[2]["id"].is_null());
        assert_eq!(responses[2]["error"]["code"], PARSE_ERROR);

        assert_eq!(responses[3]["error"]["code"], crate::protocol::METHOD_NOT_FOUND);
        assert_eq!(responses[4]["error"]["code"], crate::protocol::INVALID_PARAMS);

        assert_eq!(responses[5]["error"]["code"], crate::protocol::INTERNAL_ERROR);
        assert_eq!(
            responses[5]["error"]["message"],
            "Tool 'get_checks' is not available"
        );

        // An explicit null id is answered, with the null echoed back.
        assert_eq!(responses[6], json!({ "jsonrpc": "2.0", "id": null, "result": {} }));
    }

    #[tokio::test]
    async fn list_then_call_a_remote_tool() {
        let mut server = Server::new_async().await;
        let _catalog = server
            .mock("GET", "/mcp/tools")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{
                    "name": "get_account",
                    "inputSchema": {
                        "type": "object",
                        "properties": { "account_id": { "type": "string" } },
                        "required": ["account_id"]
                    }
                }])
                .to_string(),
            )
            .create_async()
            .await;
        let call = server
            .mock("POST", "/mcp/tools/call")
            .match_body(mockito::Matcher::Json(json!({ "account_id": "acc-1" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"plan":"team"}"#)
            .create_async()
            .await;

        let overrides: Overrides = [("account_id".to_string(), "acc-1".to_string())].into();
        let input = [
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","id":"b","method":"tools/call","params":{"name":"get_account","arguments":null}}"#,
        ]
        .join("\n");

        let responses = run(&input, api(server.url(), overrides)).await;
        call.assert_async().await;

        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1]["inputSchema"]["required"], json!([]));
        assert_eq!(
            tools[1]["inputSchema"]["properties"]["account_id"]["default"],
            "acc-1"
        );

        assert_eq!(responses[1]["id"], "b");
        assert_eq!(
            responses[1]["result"],
            json!({ "content": [{ "type": "text", "text": "{\"plan\":\"team\"}" }], "isError": false })
        );
    }
}

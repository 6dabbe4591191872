#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, McpServer, json_rpc_error, json_rpc_response, tool_text_content};
use serde_json::json;
use sg_storage::SqliteStore;

impl McpServer {
    pub(crate) fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> serde_json::Value {
        let method = request.method.as_str();

        if method == "initialize" {
            return json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "capabilities": { "tools": { "listChanged": true } },
                    "serverInfo": {
                        "name": crate::SERVER_NAME,
                        "version": crate::SERVER_VERSION,
                    },
                }),
            );
        }

        if method == "tools/list" {
            return json_rpc_response(
                request.id,
                json!({ "tools": crate::tools::tool_definitions() }),
            );
        }

        if method == "tools/call" {
            let params = request.params.unwrap_or_else(|| json!({}));
            let tool_name = params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let args = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            return match crate::tools::dispatch_tool(self, &tool_name, &args) {
                Ok(payload) => json_rpc_response(
                    request.id,
                    json!({ "content": [tool_text_content(&payload)] }),
                ),
                Err(err) => {
                    json_rpc_error(request.id, -32603, &format!("Internal error: {err}"))
                }
            };
        }

        json_rpc_error(request.id, -32601, &format!("Method not found: {method}"))
    }
}

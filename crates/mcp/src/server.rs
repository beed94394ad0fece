// MCP server: method routing and newline-delimited stdio transport

use crate::codec::{Inbound, MessageCodec};
use crate::prompts::PromptRegistry;
use crate::protocol::{
    CallToolParams, GetPromptParams, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListChangedCapability, ListPromptsResult, ListToolsResult,
    ServerCapabilities, ServerInfo, DEFAULT_PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "Taiwan AQI MCP Server";

pub struct McpServer {
    tools: ToolRegistry,
    prompts: PromptRegistry,
}

impl McpServer {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools,
            prompts: PromptRegistry::new(),
        }
    }

    /// Serve JSON-RPC over the process's stdin and stdout
    pub async fn start(&self) -> Result<()> {
        info!("MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve one newline-delimited JSON-RPC stream until EOF.
    ///
    /// Requests are handled in arrival order, one response line each. A
    /// line that is not UTF-8 or is too long gets a parse error and the
    /// session continues; only transport I/O failures end it.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, MessageCodec::new());
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        while let Some(inbound) = lines.next().await {
            let response = match inbound.context("Failed to read from MCP transport")? {
                Inbound::Line(line) => self.handle_message(&line).await,
                Inbound::Malformed(reason) => {
                    warn!(reason = %reason, "Malformed message line");
                    Some(JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::parse_error(),
                    ))
                }
            };

            if let Some(response) = response {
                let encoded = serde_json::to_string(&response)?;
                sink.send(encoded)
                    .await
                    .context("Failed to write to MCP transport")?;
            }
        }

        info!("MCP transport closed, shutting down");
        Ok(())
    }

    /// Handle one raw message line
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ))
            }
        }
    }

    /// Route a request. Notifications produce no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }
        let id = request.id.clone().unwrap_or(serde_json::Value::Null);

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        debug!(method = %request.method, "Request received");
        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => to_result(ListToolsResult {
                tools: self.tools.list_schemas(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            "prompts/list" => to_result(ListPromptsResult {
                prompts: self.prompts.list_schemas(),
            }),
            "prompts/get" => parse_params::<GetPromptParams>(request.params)
                .and_then(|params| self.prompts.get(&params))
                .and_then(to_result),
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        // Clients that send no or partial params still get the default revision.
        let protocol_version = params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
            .map(|p| {
                info!(client = %p.client_info.name, version = %p.client_info.version, "Client initializing");
                p.protocol_version
            })
            .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string());

        to_result(InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: Some(ListChangedCapability { list_changed: false }),
                prompts: Some(ListChangedCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    async fn call_tool(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;
        let result = self.tools.call(params).await?;
        to_result(result)
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<serde_json::Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_result(value: impl serde::Serialize) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

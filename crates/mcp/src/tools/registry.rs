// MCP view of the AQI tool catalog

use crate::protocol::{CallToolParams, CallToolResult, JsonRpcError, ToolSchema};
use taiwan_aqi_core::{AqiError, ToolDescriptor, ToolGateway};

impl From<ToolDescriptor> for ToolSchema {
    fn from(descriptor: ToolDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            description: descriptor.description.to_string(),
            input_schema: descriptor.input_schema(),
        }
    }
}

/// A `tools/call` that failed before producing a tool result
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ToolCallError(#[from] AqiError);

impl From<ToolCallError> for JsonRpcError {
    fn from(error: ToolCallError) -> Self {
        if error.0.is_request_error() {
            JsonRpcError::invalid_params(error.0.to_string())
        } else {
            JsonRpcError::internal_error(error.0.to_string())
        }
    }
}

/// Tool registry backed by the gateway catalog
#[derive(Clone)]
pub struct ToolRegistry {
    gateway: ToolGateway,
}

impl ToolRegistry {
    pub fn new(gateway: ToolGateway) -> Self {
        Self { gateway }
    }

    /// List all tool schemas in catalog order
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.gateway
            .list_tools()
            .into_iter()
            .map(ToolSchema::from)
            .collect()
    }

    /// Execute a tool call.
    ///
    /// Upstream transport failures become an `isError` result; request
    /// errors are returned for the protocol layer to report.
    pub async fn call(&self, params: CallToolParams) -> Result<CallToolResult, ToolCallError> {
        let arguments = params.arguments.unwrap_or_default();

        match self.gateway.call(&params.name, &arguments).await {
            Ok(body) => Ok(CallToolResult::text(body)),
            Err(e) if e.is_upstream_error() => {
                tracing::warn!(tool = %params.name, error = %e, "Tool execution failed");
                Ok(CallToolResult::error(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

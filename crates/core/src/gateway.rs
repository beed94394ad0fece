// Tool gateway: static catalog plus dispatch to the upstream API

use crate::catalog::{catalog, ToolDescriptor};
use crate::error::{AqiError, AqiResult};
use crate::tool::{AqiTool, ToolArguments};
use crate::upstream::AqiApi;
use std::sync::Arc;
use tracing::{debug, info};

/// Lists the AQI tools and forwards invocations upstream.
///
/// Holds no per-call state; concurrent calls are independent.
#[derive(Clone)]
pub struct ToolGateway {
    api: Arc<dyn AqiApi>,
}

impl ToolGateway {
    pub fn new(api: Arc<dyn AqiApi>) -> Self {
        Self { api }
    }

    /// Static catalog. Performs no I/O.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        catalog()
    }

    /// Validate and forward one invocation, returning the raw upstream body.
    ///
    /// Request errors are returned before the upstream is contacted.
    pub async fn call(&self, name: &str, arguments: &ToolArguments) -> AqiResult<String> {
        let tool = AqiTool::from_name(name).ok_or_else(|| AqiError::UnknownTool(name.to_string()))?;
        let call = tool.parse_arguments(arguments)?;
        let request = call.to_upstream_request()?;

        debug!(tool = %tool, data = %request.data, "Dispatching tool call");
        let body = self.api.call(&request).await?;
        info!(tool = %tool, bytes = body.len(), "Tool call completed");

        Ok(body)
    }
}

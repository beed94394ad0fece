//! Error types for the AQI tool gateway.

use std::time::Duration;

/// Result type for gateway operations.
pub type AqiResult<T> = Result<T, AqiError>;

/// Errors raised while listing or invoking AQI tools.
///
/// Variants fall into two classes. Request errors are raised before any
/// network I/O and belong to the caller. Upstream errors mean the single
/// outbound call did not complete.
#[derive(Debug, thiserror::Error)]
pub enum AqiError {
    /// Tool name is not in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required argument was absent.
    #[error("Missing required argument '{argument}' for tool {tool}")]
    MissingArgument { tool: String, argument: String },

    /// An argument was present but is not a string.
    #[error("Invalid argument '{argument}' for tool {tool}: {reason}")]
    InvalidArgument {
        tool: String,
        argument: String,
        reason: String,
    },

    /// The outbound HTTP call failed at the transport level.
    #[error("Upstream call failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The outbound HTTP call exceeded its time budget.
    #[error("Upstream call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The upstream payload could not be encoded.
    #[error("Failed to encode upstream payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AqiError {
    pub fn missing_argument(tool: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            tool: tool.into(),
            argument: argument.into(),
        }
    }

    /// Errors the caller caused; no upstream call was attempted.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTool(_) | Self::MissingArgument { .. } | Self::InvalidArgument { .. }
        )
    }

    /// Errors from the outbound call itself.
    pub fn is_upstream_error(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Timeout(_))
    }
}

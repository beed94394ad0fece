// Core types and functionality for the Taiwan AQI tool gateway

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod tool;
pub mod upstream;

pub use catalog::{catalog, ParameterSpec, ToolDescriptor};
pub use config::{GatewayConfig, UpstreamConfig};
pub use error::{AqiError, AqiResult};
pub use gateway::ToolGateway;
pub use tool::{AqiCall, AqiTool, ToolArguments};
pub use upstream::{AqiApi, HttpAqiApi, UpstreamRequest};

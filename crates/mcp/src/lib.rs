// MCP (Model Context Protocol) server exposing the Taiwan AQI tools

pub mod codec;
pub mod prompts;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;

// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use taiwan_aqi_core::{GatewayConfig, HttpAqiApi, ToolGateway};
use taiwan_aqi_mcp::server::McpServer;
use taiwan_aqi_mcp::tools::ToolRegistry;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "taiwan-aqi-mcp")]
#[command(about = "Taiwan air quality (AQI) tools over the Model Context Protocol", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "taiwan-aqi.toml")]
    config: PathBuf,

    /// Upstream AQI API endpoint
    #[arg(long, env = "TAIWAN_AQI_ENDPOINT")]
    endpoint: Option<Url>,

    /// Upstream request timeout in milliseconds
    #[arg(long, env = "TAIWAN_AQI_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries the protocol, so log to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("Taiwan AQI MCP Server starting...");

    let config = GatewayConfig::load(&args.config)?
        .with_overrides(args.endpoint, args.timeout_ms)
        .context("Invalid upstream configuration")?;

    tracing::info!(
        endpoint = %config.upstream.endpoint,
        timeout_ms = config.upstream.timeout_ms,
        "Upstream AQI API configured"
    );

    let api = HttpAqiApi::new(&config.upstream).context("Failed to create HTTP client")?;
    let registry = ToolRegistry::new(ToolGateway::new(Arc::new(api)));

    tracing::info!("Registered {} tools", registry.list_schemas().len());

    // Start MCP server
    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Endpoint of the public Taiwan AQI API
pub const DEFAULT_ENDPOINT: &str = "https://mcp.soft4fun.net/api.php";

/// Per-request time budget for the upstream call
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => bail!("Upstream endpoint must be http or https, got: {}", other),
        }
        if self.timeout_ms == 0 {
            bail!("Upstream timeout must be greater than zero");
        }
        Ok(())
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.upstream.validate()?;
        Ok(config)
    }

    /// Apply command-line or environment overrides on top of the file.
    pub fn with_overrides(mut self, endpoint: Option<Url>, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(endpoint) = endpoint {
            self.upstream.endpoint = endpoint;
        }
        if let Some(timeout_ms) = timeout_ms {
            self.upstream.timeout_ms = timeout_ms;
        }
        self.upstream.validate()?;
        Ok(self)
    }
}

//! TOML file configuration structures.
//!
//! These structs directly map to the `payroute-config.toml` file format.

use payroute_core::config::{
    DEFAULT_AGGREGATOR_BASE_URL, QuoteMode, SandboxConfig, SandboxRate, default_slippage,
};
use payroute_sdk::objects::TokenInfo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub sandbox: SandboxFileConfig,
    /// Tokens added to (or overriding) the built-in registry.
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// DEX aggregator section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub mode: QuoteMode,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quote request timeout, between 10 and 30 seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Slippage tolerance in percent.
    #[serde(default = "default_slippage")]
    pub default_slippage: Decimal,
    /// Credentials may also come from the environment, which takes precedence.
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            mode: QuoteMode::default(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_slippage: default_slippage(),
            credentials: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_AGGREGATOR_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Sandbox quote table. Omitted fields fall back to the built-in demo values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandboxFileConfig {
    #[serde(default)]
    pub fee_rate: Option<Decimal>,
    #[serde(default)]
    pub estimated_gas: Option<u64>,
    #[serde(default)]
    pub rates: Option<Vec<SandboxRate>>,
}

impl SandboxFileConfig {
    pub fn resolve(&self) -> SandboxConfig {
        let defaults = SandboxConfig::default();
        SandboxConfig {
            fee_rate: self.fee_rate.unwrap_or(defaults.fee_rate),
            estimated_gas: self.estimated_gas.unwrap_or(defaults.estimated_gas),
            rates: self.rates.clone().unwrap_or(defaults.rates),
        }
    }
}

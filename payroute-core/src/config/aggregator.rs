//! DEX aggregator configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::SandboxConfig;

/// Base URL of the aggregator's DEX API. Endpoint paths are joined onto it.
pub const DEFAULT_AGGREGATOR_BASE_URL: &str = "https://web3.okx.com/api/v5/dex/";

/// Timeout applied to a single quote request.
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Which quote provider to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    /// Live when credentials are configured, sandbox otherwise.
    #[default]
    Auto,
    /// Always use the fixed-rate sandbox table.
    Sandbox,
    /// Always call the aggregator. Requires credentials.
    Live,
}

/// Credentials for the aggregator API.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: String,
    pub project_id: Option<String>,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Everything the quote layer needs to pick and build its provider.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub mode: QuoteMode,
    pub base_url: String,
    pub credentials: Option<ProviderCredentials>,
    pub timeout: Duration,
    /// Slippage tolerance in percent used when a request does not name one.
    pub default_slippage: Decimal,
    pub sandbox: SandboxConfig,
}

impl AggregatorConfig {
    /// A configuration that always quotes from the sandbox table.
    pub fn sandbox() -> Self {
        Self {
            mode: QuoteMode::Sandbox,
            base_url: DEFAULT_AGGREGATOR_BASE_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_QUOTE_TIMEOUT,
            default_slippage: default_slippage(),
            sandbox: SandboxConfig::default(),
        }
    }

    /// A live configuration with the given credentials.
    pub fn live(base_url: impl Into<String>, credentials: ProviderCredentials) -> Self {
        Self {
            mode: QuoteMode::Live,
            base_url: base_url.into(),
            credentials: Some(credentials),
            timeout: DEFAULT_QUOTE_TIMEOUT,
            default_slippage: default_slippage(),
            sandbox: SandboxConfig::default(),
        }
    }

    /// Whether the live provider is selected.
    pub fn uses_live_provider(&self) -> bool {
        match self.mode {
            QuoteMode::Auto => self.credentials.is_some(),
            QuoteMode::Sandbox => false,
            QuoteMode::Live => true,
        }
    }
}

/// 0.5 percent.
pub fn default_slippage() -> Decimal {
    Decimal::new(5, 1)
}

//! Configuration module for payroute-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::{CredentialsConfig, FileConfig};
use payroute_core::config::{AggregatorConfig, ProviderCredentials, QuoteMode};
use payroute_sdk::objects::TokenInfo;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const QUOTE_TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 10..=30;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Aggregator credentials supplied on the command line or through the
/// environment. When the API key is present they replace the file's
/// `[aggregator.credentials]` section.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub passphrase: Option<String>,
    pub project_id: Option<String>,
}

impl CredentialOverrides {
    fn resolve(&self) -> Result<Option<ProviderCredentials>, ConfigError> {
        let Some(api_key) = self.api_key.clone() else {
            return Ok(None);
        };
        let (Some(secret_key), Some(passphrase)) =
            (self.secret_key.clone(), self.passphrase.clone())
        else {
            return Err(ConfigError::ValidationError(
                "PAYROUTE_API_KEY is set but PAYROUTE_SECRET_KEY or PAYROUTE_PASSPHRASE is missing"
                    .to_string(),
            ));
        };
        Ok(Some(ProviderCredentials {
            api_key,
            secret_key,
            passphrase,
            project_id: self.project_id.clone(),
        }))
    }
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub aggregator: AggregatorConfig,
    pub tokens: Vec<TokenInfo>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
    credentials: CredentialOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        listen_override: Option<SocketAddr>,
        credentials: CredentialOverrides,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            credentials,
        }
    }

    /// Load and validate the configuration.
    ///
    /// A missing file is not an error; every section has defaults.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config: FileConfig = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                toml::from_str("")?
            }
            Err(e) => return Err(e.into()),
        };
        self.resolve(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn resolve(&self, mut file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        let credentials = match self.credentials.resolve()? {
            Some(credentials) => Some(credentials),
            None => file_config
                .aggregator
                .credentials
                .clone()
                .map(convert_credentials),
        };

        let aggregator = AggregatorConfig {
            mode: file_config.aggregator.mode,
            base_url: file_config.aggregator.base_url.clone(),
            credentials,
            timeout: Duration::from_secs(file_config.aggregator.timeout_secs),
            default_slippage: file_config.aggregator.default_slippage,
            sandbox: file_config.sandbox.resolve(),
        };
        validate(&file_config, &aggregator)?;

        Ok(LoadedConfig {
            listen: file_config.server.listen,
            aggregator,
            tokens: file_config.tokens,
        })
    }
}

fn validate(file: &FileConfig, aggregator: &AggregatorConfig) -> Result<(), ConfigError> {
    let timeout = file.aggregator.timeout_secs;
    if !QUOTE_TIMEOUT_RANGE_SECS.contains(&timeout) {
        return Err(ConfigError::ValidationError(format!(
            "aggregator.timeout_secs must be between {} and {}, got {timeout}",
            QUOTE_TIMEOUT_RANGE_SECS.start(),
            QUOTE_TIMEOUT_RANGE_SECS.end()
        )));
    }

    let slippage = aggregator.default_slippage;
    if slippage <= Decimal::ZERO || slippage > Decimal::ONE_HUNDRED {
        return Err(ConfigError::ValidationError(format!(
            "aggregator.default_slippage must be in (0, 100] percent, got {slippage}"
        )));
    }

    if aggregator.mode == QuoteMode::Live && aggregator.credentials.is_none() {
        return Err(ConfigError::ValidationError(
            "aggregator.mode = \"live\" requires credentials".to_string(),
        ));
    }

    let sandbox = &aggregator.sandbox;
    if sandbox.fee_rate < Decimal::ZERO || sandbox.fee_rate >= Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "sandbox.fee_rate must be in [0, 1), got {}",
            sandbox.fee_rate
        )));
    }
    if let Some(bad) = sandbox.rates.iter().find(|r| r.rate <= Decimal::ZERO) {
        return Err(ConfigError::ValidationError(format!(
            "sandbox rate {} -> {} must be positive",
            bad.from, bad.to
        )));
    }

    for token in &file.tokens {
        if token.address.is_empty() || token.symbol.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "token on chain {} needs both an address and a symbol",
                token.chain_id
            )));
        }
    }
    Ok(())
}

fn convert_credentials(c: CredentialsConfig) -> ProviderCredentials {
    ProviderCredentials {
        api_key: c.api_key,
        secret_key: c.secret_key,
        passphrase: c.passphrase,
        project_id: c.project_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(credentials: CredentialOverrides) -> ConfigLoader {
        ConfigLoader::new("./does-not-matter.toml", None, credentials)
    }

    fn parse(toml_str: &str) -> FileConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_defaults_resolve_to_sandbox() {
        let loaded = loader(CredentialOverrides::default())
            .resolve(parse(""))
            .unwrap();
        assert!(!loaded.aggregator.uses_live_provider());
        assert_eq!(loaded.aggregator.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_bounds() {
        for secs in [9, 31] {
            let toml_str = format!("[aggregator]\ntimeout_secs = {secs}\n");
            let err = loader(CredentialOverrides::default())
                .resolve(parse(&toml_str))
                .unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)));
        }
        let loaded = loader(CredentialOverrides::default())
            .resolve(parse("[aggregator]\ntimeout_secs = 30\n"))
            .unwrap();
        assert_eq!(loaded.aggregator.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_live_mode_requires_credentials() {
        let err = loader(CredentialOverrides::default())
            .resolve(parse("[aggregator]\nmode = \"live\"\n"))
            .unwrap_err();
        assert!(err.to_string().contains("requires credentials"));
    }

    #[test]
    fn test_env_credentials_take_precedence() {
        let overrides = CredentialOverrides {
            api_key: Some("env-key".to_string()),
            secret_key: Some("env-secret".to_string()),
            passphrase: Some("env-pass".to_string()),
            project_id: None,
        };
        let toml_str = r#"
[aggregator.credentials]
api_key = "file-key"
secret_key = "file-secret"
passphrase = "file-pass"
"#;
        let loaded = loader(overrides).resolve(parse(toml_str)).unwrap();
        let credentials = loaded.aggregator.credentials.unwrap();
        assert_eq!(credentials.api_key, "env-key");
        assert!(loaded.aggregator.mode == QuoteMode::Auto);
    }

    #[test]
    fn test_partial_env_credentials_rejected() {
        let overrides = CredentialOverrides {
            api_key: Some("env-key".to_string()),
            ..Default::default()
        };
        assert!(loader(overrides).resolve(parse("")).is_err());
    }

    #[test]
    fn test_invalid_sandbox_values() {
        let err = loader(CredentialOverrides::default())
            .resolve(parse("[sandbox]\nfee_rate = \"1\"\n"))
            .unwrap_err();
        assert!(err.to_string().contains("fee_rate"));

        let toml_str = "[[sandbox.rates]]\nfrom = \"ETH\"\nto = \"USDC\"\nrate = \"0\"\n";
        let err = loader(CredentialOverrides::default())
            .resolve(parse(toml_str))
            .unwrap_err();
        assert!(err.to_string().contains("ETH -> USDC"));
    }

    #[test]
    fn test_listen_override() {
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let loader = ConfigLoader::new("./x.toml", Some(addr), CredentialOverrides::default());
        assert_eq!(loader.resolve(parse("")).unwrap().listen, addr);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("payroute-{}.toml", uuid::Uuid::new_v4()));
        let loaded = ConfigLoader::new(&path, None, CredentialOverrides::default())
            .load()
            .unwrap();
        assert_eq!(loaded.listen.port(), 8080);
    }
}

//! Swap quoting.
//!
//! - `QuoteAdapter`: validates a `QuoteRequest` and hands the normalized
//!   `QuoteParams` to the configured provider
//! - `SandboxQuoteProvider`: fixed-rate table, no network
//! - `LiveQuoteProvider`: signed HTTP call to the DEX aggregator
//!
//! The provider is chosen once, when the adapter is built.

pub mod live;
pub mod sandbox;

pub use live::LiveQuoteProvider;
pub use sandbox::SandboxQuoteProvider;

use crate::config::AggregatorConfig;
use crate::tokens::TokenRegistry;
use async_trait::async_trait;
use payroute_sdk::objects::{Address, ChainId, Quote, QuoteRequest};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Why a quote could not be produced.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The amount is empty, unparseable, zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The slippage tolerance is outside (0, 100] percent.
    #[error("invalid slippage: {0}")]
    InvalidSlippage(String),

    /// The provider has no route, rejected the request, or could not be reached.
    #[error("route unavailable: {0}")]
    RouteUnavailable(String),

    /// The provider rejected our credentials or signature.
    #[error("provider authentication failed: {0}")]
    ProviderAuth(String),

    /// The provider answered with something we cannot interpret.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl QuoteError {
    /// Whether the request itself was at fault, rather than the provider.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            QuoteError::InvalidAmount(_) | QuoteError::InvalidSlippage(_)
        )
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            QuoteError::RouteUnavailable("quote request timed out".to_string())
        } else if e.is_decode() {
            QuoteError::MalformedResponse(e.to_string())
        } else {
            QuoteError::RouteUnavailable(format!("quote request failed: {e}"))
        }
    }
}

/// Errors raised while building a provider from configuration.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    #[error("live quote mode requires aggregator credentials")]
    MissingCredentials,

    #[error("invalid aggregator base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("failed to build aggregator http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A validated quote request as seen by providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParams {
    pub chain_id: ChainId,
    pub from_token: Address,
    pub to_token: Address,
    /// Strictly positive amount in human units of `from_token`.
    pub amount: Decimal,
    /// Slippage tolerance in percent.
    pub slippage: Decimal,
    pub wallet_address: Address,
}

/// Source of swap quotes.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Price converting `params.amount` of `from_token` into `to_token`.
    async fn quote(&self, params: &QuoteParams) -> Result<Quote, QuoteError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Build the provider selected by `config`.
pub fn build_provider(
    config: &AggregatorConfig,
    registry: Arc<TokenRegistry>,
) -> Result<Arc<dyn QuoteProvider>, ProviderBuildError> {
    if config.uses_live_provider() {
        let credentials = config
            .credentials
            .clone()
            .ok_or(ProviderBuildError::MissingCredentials)?;
        let provider =
            LiveQuoteProvider::new(&config.base_url, credentials, config.timeout, registry)?;
        Ok(Arc::new(provider))
    } else {
        Ok(Arc::new(SandboxQuoteProvider::new(&config.sandbox, registry)))
    }
}

/// Validates quote requests and forwards them to a provider.
///
/// Stateless: every call goes to the provider, nothing is cached and failed
/// calls are not retried.
#[derive(Clone)]
pub struct QuoteAdapter {
    provider: Arc<dyn QuoteProvider>,
    default_slippage: Decimal,
}

impl QuoteAdapter {
    pub fn new(provider: Arc<dyn QuoteProvider>, default_slippage: Decimal) -> Self {
        Self {
            provider,
            default_slippage,
        }
    }

    pub fn from_config(
        config: &AggregatorConfig,
        registry: Arc<TokenRegistry>,
    ) -> Result<Self, ProviderBuildError> {
        let provider = build_provider(config, registry)?;
        Ok(Self::new(provider, config.default_slippage))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Fetch a quote. Invalid input is rejected before the provider is called.
    #[tracing::instrument(
        skip_all,
        err(Display),
        name = "Quote:get_quote",
        fields(chain_id = %req.chain_id, provider = self.provider.name())
    )]
    pub async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote, QuoteError> {
        let params = self.validate(req)?;
        self.provider.quote(&params).await
    }

    /// Normalize a request into provider parameters.
    pub fn validate(&self, req: &QuoteRequest) -> Result<QuoteParams, QuoteError> {
        let amount = parse_amount(&req.amount)?;
        let slippage = req.slippage.unwrap_or(self.default_slippage);
        if slippage <= Decimal::ZERO || slippage > Decimal::ONE_HUNDRED {
            return Err(QuoteError::InvalidSlippage(format!(
                "{slippage}% is outside (0, 100]"
            )));
        }
        Ok(QuoteParams {
            chain_id: req.chain_id,
            from_token: req.from_token.clone(),
            to_token: req.to_token.clone(),
            amount,
            slippage,
            wallet_address: req.wallet_address.clone(),
        })
    }
}

/// Parse a strictly positive decimal amount.
pub fn parse_amount(raw: &str) -> Result<Decimal, QuoteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QuoteError::InvalidAmount("amount is empty".to_string()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|e| QuoteError::InvalidAmount(format!("{trimmed:?}: {e}")))?;
    if amount <= Decimal::ZERO {
        return Err(QuoteError::InvalidAmount(format!(
            "amount must be positive, got {trimmed}"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use payroute_sdk::objects::NATIVE_TOKEN_ADDRESS;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts calls and answers with a fixed result.
    pub(crate) struct CountingProvider {
        pub calls: AtomicUsize,
        pub fail_with: Option<fn() -> QuoteError>,
    }

    impl CountingProvider {
        pub(crate) fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        pub(crate) fn failing(fail_with: fn() -> QuoteError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(fail_with),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for CountingProvider {
        async fn quote(&self, params: &QuoteParams) -> Result<Quote, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(fail_with) = self.fail_with {
                return Err(fail_with());
            }
            Ok(Quote {
                input_amount: params.amount,
                output_amount: params.amount * Decimal::TWO,
                estimated_gas: 21_000,
                trade_fee_bps: 0,
                price_impact_pct: Decimal::ZERO,
                route_hops: vec![],
                slippage_tolerance: params.slippage,
            })
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    pub(crate) fn quote_request(amount: &str) -> QuoteRequest {
        QuoteRequest {
            chain_id: ChainId::ETHEREUM,
            from_token: Address::new(NATIVE_TOKEN_ADDRESS),
            to_token: Address::new("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            amount: amount.to_string(),
            slippage: None,
            wallet_address: Address::new("0x00000000000000000000000000000000000000aa"),
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1.50 ").unwrap(), Decimal::new(15, 1));
        assert!(matches!(parse_amount(""), Err(QuoteError::InvalidAmount(_))));
        assert!(matches!(parse_amount("   "), Err(QuoteError::InvalidAmount(_))));
        assert!(matches!(parse_amount("0"), Err(QuoteError::InvalidAmount(_))));
        assert!(matches!(parse_amount("0.000"), Err(QuoteError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-3"), Err(QuoteError::InvalidAmount(_))));
        assert!(matches!(parse_amount("abc"), Err(QuoteError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_provider() {
        let provider = Arc::new(CountingProvider::ok());
        let adapter = QuoteAdapter::new(provider.clone(), Decimal::new(5, 1));
        for amount in ["", "0", "-1"] {
            let err = adapter.get_quote(&quote_request(amount)).await.unwrap_err();
            assert!(err.is_invalid_input());
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_default_and_explicit_slippage() {
        let provider = Arc::new(CountingProvider::ok());
        let adapter = QuoteAdapter::new(provider.clone(), Decimal::new(5, 1));

        let quote = adapter.get_quote(&quote_request("2")).await.unwrap();
        assert_eq!(quote.slippage_tolerance, Decimal::new(5, 1));
        assert_eq!(quote.output_amount, Decimal::from(4));

        let mut req = quote_request("2");
        req.slippage = Some(Decimal::ONE);
        let quote = adapter.get_quote(&req).await.unwrap();
        assert_eq!(quote.slippage_tolerance, Decimal::ONE);

        req.slippage = Some(Decimal::ZERO);
        assert!(matches!(
            adapter.get_quote(&req).await,
            Err(QuoteError::InvalidSlippage(_))
        ));
        req.slippage = Some(Decimal::from(101));
        assert!(matches!(
            adapter.get_quote(&req).await,
            Err(QuoteError::InvalidSlippage(_))
        ));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let provider = Arc::new(CountingProvider::failing(|| {
            QuoteError::RouteUnavailable("no liquidity".to_string())
        }));
        let adapter = QuoteAdapter::new(provider.clone(), Decimal::new(5, 1));
        let err = adapter.get_quote(&quote_request("1")).await.unwrap_err();
        assert!(matches!(err, QuoteError::RouteUnavailable(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_build_provider_selection() {
        let registry = Arc::new(TokenRegistry::with_defaults());
        let sandbox = build_provider(&AggregatorConfig::sandbox(), registry.clone()).unwrap();
        assert_eq!(sandbox.name(), "sandbox");

        let mut live = AggregatorConfig::sandbox();
        live.mode = crate::config::QuoteMode::Live;
        assert!(matches!(
            build_provider(&live, registry),
            Err(ProviderBuildError::MissingCredentials)
        ));
    }
}

//! Fixed-rate quote provider for development and testing.
//!
//! Output is `amount * rate * (1 - fee_rate)`, where `rate` comes from a
//! symbol-keyed pair table. No network access.

use super::{QuoteError, QuoteParams, QuoteProvider};
use crate::config::SandboxConfig;
use crate::tokens::TokenRegistry;
use async_trait::async_trait;
use payroute_sdk::objects::{Address, Quote, RouteHop, TokenInfo};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use std::sync::Arc;

const SANDBOX_DEX_NAME: &str = "Sandbox";

pub struct SandboxQuoteProvider {
    registry: Arc<TokenRegistry>,
    rates: HashMap<(String, String), Decimal>,
    fee_rate: Decimal,
    estimated_gas: u64,
}

impl SandboxQuoteProvider {
    pub fn new(config: &SandboxConfig, registry: Arc<TokenRegistry>) -> Self {
        let rates = config
            .rates
            .iter()
            .map(|r| {
                (
                    (r.from.to_ascii_uppercase(), r.to.to_ascii_uppercase()),
                    r.rate,
                )
            })
            .collect();
        Self {
            registry,
            rates,
            fee_rate: config.fee_rate,
            estimated_gas: config.estimated_gas,
        }
    }

    /// Pre-fee rate for a symbol pair.
    pub fn rate(&self, from_symbol: &str, to_symbol: &str) -> Option<Decimal> {
        self.rates
            .get(&(from_symbol.to_ascii_uppercase(), to_symbol.to_ascii_uppercase()))
            .copied()
    }

    fn token(&self, params: &QuoteParams, which: &Address) -> Result<&TokenInfo, QuoteError> {
        self.registry.lookup(params.chain_id, which).ok_or_else(|| {
            QuoteError::RouteUnavailable(format!(
                "token {which} is not supported on chain {}",
                params.chain_id
            ))
        })
    }

    fn trade_fee_bps(&self) -> u32 {
        (self.fee_rate * Decimal::from(10_000))
            .round()
            .to_u32()
            .unwrap_or(0)
    }
}

#[async_trait]
impl QuoteProvider for SandboxQuoteProvider {
    async fn quote(&self, params: &QuoteParams) -> Result<Quote, QuoteError> {
        let from = self.token(params, &params.from_token)?;
        let to = self.token(params, &params.to_token)?;
        let rate = self.rate(&from.symbol, &to.symbol).ok_or_else(|| {
            QuoteError::RouteUnavailable(format!(
                "no sandbox rate for {} -> {}",
                from.symbol, to.symbol
            ))
        })?;

        let fee_factor = Decimal::ONE - self.fee_rate;
        let output_amount = params
            .amount
            .checked_mul(rate)
            .and_then(|gross| gross.checked_mul(fee_factor))
            .ok_or_else(|| QuoteError::InvalidAmount("amount is too large".to_string()))?
            .normalize();
        if output_amount <= Decimal::ZERO {
            return Err(QuoteError::RouteUnavailable(
                "provider quoted no output".to_string(),
            ));
        }

        tracing::debug!(
            from = %from.symbol,
            to = %to.symbol,
            amount = %params.amount,
            output = %output_amount,
            "Sandbox quote computed"
        );

        Ok(Quote {
            input_amount: params.amount,
            output_amount,
            estimated_gas: self.estimated_gas,
            trade_fee_bps: self.trade_fee_bps(),
            price_impact_pct: Decimal::ZERO,
            route_hops: vec![RouteHop {
                dex_name: SANDBOX_DEX_NAME.to_string(),
                from_token_symbol: from.symbol.clone(),
                to_token_symbol: to.symbol.clone(),
                share_percent: Decimal::ONE_HUNDRED,
            }],
            slippage_tolerance: params.slippage,
        })
    }

    fn name(&self) -> &'static str {
        "sandbox"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payroute_sdk::objects::{ChainId, NATIVE_TOKEN_ADDRESS};
    use std::str::FromStr;

    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
    const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    const ETH: &str = NATIVE_TOKEN_ADDRESS;

    fn provider() -> SandboxQuoteProvider {
        SandboxQuoteProvider::new(
            &SandboxConfig::default(),
            Arc::new(TokenRegistry::with_defaults()),
        )
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn params(from: &str, to: &str, amount: &str) -> QuoteParams {
        QuoteParams {
            chain_id: ChainId::ETHEREUM,
            from_token: Address::new(from),
            to_token: Address::new(to),
            amount: dec(amount),
            slippage: dec("0.5"),
            wallet_address: Address::new("0x00000000000000000000000000000000000000aa"),
        }
    }

    async fn output(from: &str, to: &str, amount: &str) -> Decimal {
        provider()
            .quote(&params(from, to, amount))
            .await
            .unwrap()
            .output_amount
    }

    #[tokio::test]
    async fn test_eth_to_usdc() {
        let quote = provider().quote(&params(ETH, USDC, "1")).await.unwrap();
        assert_eq!(quote.output_amount, dec("2492.5"));
        assert_eq!(quote.input_amount, dec("1"));
        assert_eq!(quote.trade_fee_bps, 30);
        assert_eq!(quote.estimated_gas, 150_000);
        assert_eq!(quote.price_impact_pct, Decimal::ZERO);
        assert_eq!(quote.slippage_tolerance, dec("0.5"));
        assert_eq!(quote.route_hops.len(), 1);
        assert_eq!(quote.route_hops[0].from_token_symbol, "ETH");
        assert_eq!(quote.route_hops[0].to_token_symbol, "USDC");
    }

    #[tokio::test]
    async fn test_usdc_to_usdt() {
        assert_eq!(output(USDC, USDT, "100").await, dec("99.6003"));
    }

    #[tokio::test]
    async fn test_every_default_pair() {
        let cases = [
            (ETH, USDC, "1", "2492.5"),
            (ETH, USDT, "1", "2492.5"),
            (ETH, DAI, "2", "4985"),
            (WETH, USDC, "1", "2492.5"),
            (USDC, ETH, "1000", "0.3988"),
            (USDT, ETH, "1000", "0.3988"),
            (DAI, ETH, "2500", "0.997"),
            (USDC, WETH, "1000", "0.3988"),
            (ETH, WETH, "1", "0.997"),
            (WETH, ETH, "3", "2.991"),
            (USDC, USDT, "100", "99.6003"),
            (USDT, USDC, "100", "99.6003"),
            (USDC, DAI, "100", "99.6003"),
            (DAI, USDC, "100", "99.6003"),
            (USDT, DAI, "1", "0.996003"),
            (DAI, USDT, "10", "9.96003"),
        ];
        assert_eq!(cases.len(), SandboxConfig::default().rates.len());
        for (from, to, amount, expected) in cases {
            assert_eq!(
                output(from, to, amount).await,
                dec(expected),
                "{from} -> {to} for {amount}"
            );
        }
    }

    #[tokio::test]
    async fn test_round_trips_stay_positive() {
        let provider = provider();
        let pairs = [(ETH, USDC), (USDC, USDT), (ETH, WETH), (DAI, ETH), (USDT, DAI)];
        for amount in ["0.000001", "1", "12345.678", "1000000000"] {
            for (a, b) in pairs {
                let there = provider.quote(&params(a, b, amount)).await.unwrap();
                assert!(there.output_amount > Decimal::ZERO);
                let mut back = params(b, a, "1");
                back.amount = there.output_amount;
                let back = provider.quote(&back).await.unwrap();
                assert!(back.output_amount > Decimal::ZERO);
                assert!(back.output_amount < dec(amount), "fees must compound");
            }
        }
    }

    #[tokio::test]
    async fn test_output_rounding_to_zero_is_unavailable() {
        let err = provider()
            .quote(&params(USDC, ETH, "0.0000000000000000000000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::RouteUnavailable(_)), "{err}");
    }

    #[tokio::test]
    async fn test_unknown_token_and_pair() {
        let provider = provider();
        let err = provider
            .quote(&params(ETH, "0x0000000000000000000000000000000000000bad", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::RouteUnavailable(_)));

        let mut on_base = params(
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            "0x4200000000000000000000000000000000000006",
            "1",
        );
        on_base.chain_id = ChainId::BASE;
        assert!(provider.quote(&on_base).await.is_ok());

        on_base.to_token = Address::new("0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb");
        on_base.from_token = Address::new("0x4200000000000000000000000000000000000006");
        let err = provider.quote(&on_base).await.unwrap_err();
        assert!(err.to_string().contains("WETH -> DAI"));
    }

    #[tokio::test]
    async fn test_addresses_match_in_any_case() {
        let lower = output(&ETH.to_lowercase(), &USDC.to_lowercase(), "1").await;
        assert_eq!(lower, dec("2492.5"));
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::{Address, ChainId};

/// Input of a route decision. Built per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Token the payer will send.
    pub payer_token: Address,
    /// Token the payee wants to receive.
    pub payee_token: Address,
    /// Amount in human units of the payer token, as a decimal string.
    pub amount: String,
    pub chain_id: ChainId,
    pub wallet_address: Address,
}

impl RouteRequest {
    /// Whether the payment settles in the token the payer sends.
    pub fn is_direct(&self) -> bool {
        self.payer_token == self.payee_token
    }
}

/// Outcome of a route decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteResult {
    /// Payer and payee use the same token; no conversion needed.
    Direct { amount: String },
    /// A swap quote was obtained.
    SwapResolved {
        input_amount: Decimal,
        output_amount: Decimal,
        estimated_gas: u64,
        trade_fee_bps: u32,
        price_impact_pct: Decimal,
        route_hops: Vec<RouteHop>,
        slippage_tolerance: Decimal,
    },
    /// A swap is required but no quote could be obtained.
    SwapUnavailable { reason: String },
}

impl RouteResult {
    /// `false` only when a required swap has no route.
    pub fn can_proceed(&self) -> bool {
        !matches!(self, RouteResult::SwapUnavailable { .. })
    }
}

impl From<Quote> for RouteResult {
    fn from(quote: Quote) -> Self {
        RouteResult::SwapResolved {
            input_amount: quote.input_amount,
            output_amount: quote.output_amount,
            estimated_gas: quote.estimated_gas,
            trade_fee_bps: quote.trade_fee_bps,
            price_impact_pct: quote.price_impact_pct,
            route_hops: quote.route_hops,
            slippage_tolerance: quote.slippage_tolerance,
        }
    }
}

/// Parameters of a quote as accepted over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub chain_id: ChainId,
    pub from_token: Address,
    pub to_token: Address,
    /// Amount in human units of `from_token`.
    pub amount: String,
    /// Slippage tolerance in percent. Defaults to 0.5 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage: Option<Decimal>,
    pub wallet_address: Address,
}

impl From<&RouteRequest> for QuoteRequest {
    fn from(req: &RouteRequest) -> Self {
        QuoteRequest {
            chain_id: req.chain_id,
            from_token: req.payer_token.clone(),
            to_token: req.payee_token.clone(),
            amount: req.amount.clone(),
            slippage: None,
            wallet_address: req.wallet_address.clone(),
        }
    }
}

/// A priced estimate of converting an amount of one token into another.
///
/// All amounts are in human (decimal-adjusted) units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub input_amount: Decimal,
    pub output_amount: Decimal,
    pub estimated_gas: u64,
    pub trade_fee_bps: u32,
    pub price_impact_pct: Decimal,
    pub route_hops: Vec<RouteHop>,
    /// Slippage tolerance in percent.
    pub slippage_tolerance: Decimal,
}

/// One leg of the aggregator's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHop {
    pub dex_name: String,
    pub from_token_symbol: String,
    pub to_token_symbol: String,
    /// Share of the input routed through this leg, in percent.
    pub share_percent: Decimal,
}

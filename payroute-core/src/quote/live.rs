//! Live quote provider backed by the DEX aggregator's quote endpoint.
//!
//! `GET {base_url}aggregator/quote` with the amount in base units and the
//! slippage as a fraction. Requests are signed with
//! [`payroute_sdk::signature`]. The response envelope is
//! `{ code, msg, data: [quote] }` where `code == 0` means success.

use super::{ProviderBuildError, QuoteError, QuoteParams, QuoteProvider};
use crate::config::ProviderCredentials;
use crate::tokens::TokenRegistry;
use async_trait::async_trait;
use payroute_sdk::objects::{Quote, RouteHop};
use payroute_sdk::signature::{
    ACCESS_KEY_HEADER, PASSPHRASE_HEADER, PROJECT_HEADER, RequestSignature, SIGN_HEADER,
    TIMESTAMP_HEADER,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const QUOTE_PATH: &str = "aggregator/quote";

/// Envelope codes the aggregator uses for key, passphrase, timestamp and
/// signature problems.
const AUTH_ERROR_CODES: std::ops::RangeInclusive<i64> = 50102..=50114;

pub struct LiveQuoteProvider {
    http_client: reqwest::Client,
    quote_url: Url,
    credentials: ProviderCredentials,
    registry: Arc<TokenRegistry>,
}

impl LiveQuoteProvider {
    /// Create a provider for `base_url`. A missing trailing slash is added so
    /// the endpoint path joins under it.
    pub fn new(
        base_url: &str,
        credentials: ProviderCredentials,
        timeout: Duration,
        registry: Arc<TokenRegistry>,
    ) -> Result<Self, ProviderBuildError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let quote_url = Url::parse(&base)?.join(QUOTE_PATH)?;
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            quote_url,
            credentials,
            registry,
        })
    }

    /// Build the full request URL for `params`.
    fn request_url(&self, params: &QuoteParams) -> Result<Url, QuoteError> {
        let from = self
            .registry
            .lookup(params.chain_id, &params.from_token)
            .ok_or_else(|| {
                QuoteError::RouteUnavailable(format!(
                    "decimals of token {} on chain {} are unknown",
                    params.from_token, params.chain_id
                ))
            })?;
        let scale = unit_scale(from.decimals).ok_or_else(|| {
            QuoteError::RouteUnavailable(format!("unsupported token decimals {}", from.decimals))
        })?;
        let base_units = params
            .amount
            .checked_mul(scale)
            .ok_or_else(|| QuoteError::InvalidAmount("amount is too large".to_string()))?
            .trunc();
        if base_units <= Decimal::ZERO {
            return Err(QuoteError::InvalidAmount(format!(
                "{} is below the smallest unit of {}",
                params.amount, from.symbol
            )));
        }
        let slippage = (params.slippage / Decimal::ONE_HUNDRED).normalize();

        let mut url = self.quote_url.clone();
        url.query_pairs_mut()
            .append_pair("chainId", &params.chain_id.to_string())
            .append_pair("amount", &base_units.normalize().to_string())
            .append_pair("fromTokenAddress", params.from_token.as_str())
            .append_pair("toTokenAddress", params.to_token.as_str())
            .append_pair("slippage", &slippage.to_string())
            .append_pair("userWalletAddress", params.wallet_address.as_str());
        Ok(url)
    }

    fn signed_request(&self, url: Url) -> reqwest::RequestBuilder {
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let signed = RequestSignature::new(
            self.credentials.secret_key.as_bytes(),
            "GET",
            &path_and_query,
            "",
        );
        let mut request = self
            .http_client
            .get(url)
            .header(ACCESS_KEY_HEADER, &self.credentials.api_key)
            .header(SIGN_HEADER, signed.signature)
            .header(TIMESTAMP_HEADER, signed.timestamp)
            .header(PASSPHRASE_HEADER, &self.credentials.passphrase);
        if let Some(project) = &self.credentials.project_id {
            request = request.header(PROJECT_HEADER, project);
        }
        request
    }
}

#[async_trait]
impl QuoteProvider for LiveQuoteProvider {
    async fn quote(&self, params: &QuoteParams) -> Result<Quote, QuoteError> {
        let url = self.request_url(params)?;
        debug!(url = %url, "Requesting aggregator quote");

        let response = self.signed_request(url).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::ProviderAuth(format!("status {status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Aggregator returned an error status");
            return Err(QuoteError::RouteUnavailable(format!(
                "provider returned status {status}"
            )));
        }

        let bytes = response.bytes().await?;
        let envelope: QuoteEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| QuoteError::MalformedResponse(e.to_string()))?;
        let fallback_decimals = self
            .registry
            .lookup(params.chain_id, &params.to_token)
            .map(|t| t.decimals);
        envelope.into_quote(params, fallback_decimals)
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

/// `10^decimals` for token decimals up to 19.
fn unit_scale(decimals: u32) -> Option<Decimal> {
    10u64.checked_pow(decimals).map(Decimal::from)
}

/// Read a decimal that the API may send as either a string or a number.
fn decimal_from(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnvelopeCode {
    Number(i64),
    Text(String),
}

impl EnvelopeCode {
    fn as_i64(&self) -> Option<i64> {
        match self {
            EnvelopeCode::Number(n) => Some(*n),
            EnvelopeCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for EnvelopeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeCode::Number(n) => write!(f, "{n}"),
            EnvelopeCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    code: EnvelopeCode,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteData {
    to_token_amount: Value,
    #[serde(default, alias = "estimatedGas")]
    estimate_gas_fee: Option<Value>,
    #[serde(default)]
    trade_fee: Option<Value>,
    #[serde(default, alias = "priceImpact")]
    price_impact_percentage: Option<Value>,
    #[serde(default, alias = "route")]
    dex_router_list: Vec<DexRouter>,
    #[serde(default)]
    from_token: Option<TokenMeta>,
    #[serde(default)]
    to_token: Option<TokenMeta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenMeta {
    #[serde(default)]
    decimal: Option<Value>,
    #[serde(default)]
    token_symbol: Option<String>,
    #[serde(default)]
    token_unit_price: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexRouter {
    #[serde(default)]
    router_percent: Option<Value>,
    #[serde(default)]
    sub_router_list: Vec<SubRouter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubRouter {
    #[serde(default)]
    dex_protocol: Vec<DexProtocol>,
    #[serde(default)]
    from_token: Option<TokenMeta>,
    #[serde(default)]
    to_token: Option<TokenMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexProtocol {
    dex_name: String,
    #[serde(default)]
    percent: Option<Value>,
}

/// Read a share in percent, defaulting to 100 when absent.
fn share_of(value: Option<&Value>) -> Result<Decimal, QuoteError> {
    let Some(value) = value else {
        return Ok(Decimal::ONE_HUNDRED);
    };
    let share = decimal_from(value).ok_or_else(|| {
        QuoteError::MalformedResponse(format!("route share {value} is not a number"))
    })?;
    if share < Decimal::ZERO || share > Decimal::ONE_HUNDRED {
        return Err(QuoteError::MalformedResponse(format!(
            "route share {share} is outside [0, 100]"
        )));
    }
    Ok(share)
}

/// Flatten routers, sub-routers and protocols into hops. A hop's share is the
/// router's share of the protocol's share.
fn route_hops(routers: &[DexRouter]) -> Result<Vec<RouteHop>, QuoteError> {
    let mut hops = Vec::new();
    for router in routers {
        let router_share = share_of(router.router_percent.as_ref())?;
        for sub in &router.sub_router_list {
            for protocol in &sub.dex_protocol {
                let share = share_of(protocol.percent.as_ref())?;
                let share_percent = router_share
                    .checked_mul(share)
                    .and_then(|s| s.checked_div(Decimal::ONE_HUNDRED))
                    .ok_or_else(|| {
                        QuoteError::MalformedResponse("route share overflows".to_string())
                    })?
                    .normalize();
                hops.push(RouteHop {
                    dex_name: protocol.dex_name.clone(),
                    from_token_symbol: symbol_of(&sub.from_token),
                    to_token_symbol: symbol_of(&sub.to_token),
                    share_percent,
                });
            }
        }
    }
    Ok(hops)
}

fn symbol_of(meta: &Option<TokenMeta>) -> String {
    meta.as_ref()
        .and_then(|m| m.token_symbol.clone())
        .unwrap_or_default()
}

impl QuoteEnvelope {
    fn into_quote(
        self,
        params: &QuoteParams,
        fallback_decimals: Option<u32>,
    ) -> Result<Quote, QuoteError> {
        match self.code.as_i64() {
            Some(0) => {}
            Some(code) if AUTH_ERROR_CODES.contains(&code) => {
                return Err(QuoteError::ProviderAuth(format!(
                    "{} (code {code})",
                    self.msg
                )));
            }
            _ => {
                return Err(QuoteError::RouteUnavailable(format!(
                    "{} (code {})",
                    self.msg, self.code
                )));
            }
        }

        let data = self
            .data
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::MalformedResponse("empty quote data".to_string()))?;

        let to_decimals = data
            .to_token
            .as_ref()
            .and_then(|t| t.decimal.as_ref())
            .and_then(decimal_from)
            .and_then(|d| d.to_u32())
            .or(fallback_decimals)
            .ok_or_else(|| {
                QuoteError::MalformedResponse("output token decimals are unknown".to_string())
            })?;
        let scale = unit_scale(to_decimals).ok_or_else(|| {
            QuoteError::MalformedResponse(format!("unsupported token decimals {to_decimals}"))
        })?;
        let raw_output = decimal_from(&data.to_token_amount).ok_or_else(|| {
            QuoteError::MalformedResponse(format!(
                "toTokenAmount {} is not a number",
                data.to_token_amount
            ))
        })?;
        let output_amount = raw_output
            .checked_div(scale)
            .ok_or_else(|| {
                QuoteError::MalformedResponse(format!("toTokenAmount {raw_output} is out of range"))
            })?
            .normalize();
        if output_amount <= Decimal::ZERO {
            return Err(QuoteError::RouteUnavailable(
                "provider quoted no output".to_string(),
            ));
        }

        let estimated_gas = data
            .estimate_gas_fee
            .as_ref()
            .and_then(decimal_from)
            .and_then(|g| g.trunc().to_u64())
            .unwrap_or(0);
        let price_impact_pct = data
            .price_impact_percentage
            .as_ref()
            .and_then(decimal_from)
            .unwrap_or(Decimal::ZERO);
        let trade_fee_bps = trade_fee_bps(
            data.trade_fee.as_ref().and_then(decimal_from),
            params.amount,
            data.from_token
                .as_ref()
                .and_then(|t| t.token_unit_price.as_ref())
                .and_then(decimal_from),
        );

        let route_hops = route_hops(&data.dex_router_list)?;

        Ok(Quote {
            input_amount: params.amount,
            output_amount,
            estimated_gas,
            trade_fee_bps,
            price_impact_pct,
            route_hops,
            slippage_tolerance: params.slippage,
        })
    }
}

/// Fee in basis points of the input's USD value. Zero when the unit price
/// is missing.
fn trade_fee_bps(fee_usd: Option<Decimal>, amount: Decimal, unit_price: Option<Decimal>) -> u32 {
    let (Some(fee), Some(price)) = (fee_usd, unit_price) else {
        return 0;
    };
    let Some(input_usd) = amount.checked_mul(price) else {
        return 0;
    };
    if input_usd <= Decimal::ZERO || fee <= Decimal::ZERO {
        return 0;
    }
    fee.checked_div(input_usd)
        .and_then(|ratio| ratio.checked_mul(Decimal::from(10_000)))
        .and_then(|bps| bps.round().to_u32())
        .unwrap_or(0)
}

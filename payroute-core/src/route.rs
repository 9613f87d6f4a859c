//! Payment route selection.
//!
//! Decides whether a payment settles directly or needs a swap, and folds
//! every quote failure into `RouteResult::SwapUnavailable` so callers never
//! handle errors on this path.

use crate::config::AggregatorConfig;
use crate::quote::{ProviderBuildError, QuoteAdapter};
use crate::tokens::TokenRegistry;
use payroute_sdk::objects::{QuoteRequest, RouteRequest, RouteResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct RouteSelector {
    adapter: QuoteAdapter,
}

impl RouteSelector {
    pub fn new(adapter: QuoteAdapter) -> Self {
        Self { adapter }
    }

    /// Build a selector whose provider is chosen by `config`.
    pub fn from_config(
        config: &AggregatorConfig,
        registry: Arc<TokenRegistry>,
    ) -> Result<Self, ProviderBuildError> {
        Ok(Self::new(QuoteAdapter::from_config(config, registry)?))
    }

    pub fn adapter(&self) -> &QuoteAdapter {
        &self.adapter
    }

    /// Resolve the route for `req`.
    ///
    /// Equal tokens return `Direct` without touching the quote adapter.
    pub async fn select_route(&self, req: &RouteRequest) -> RouteResult {
        if req.is_direct() {
            debug!(
                chain_id = %req.chain_id,
                token = %req.payee_token,
                amount = %req.amount,
                "Direct route, no swap needed"
            );
            return RouteResult::Direct {
                amount: req.amount.clone(),
            };
        }

        match self.adapter.get_quote(&QuoteRequest::from(req)).await {
            Ok(quote) => {
                info!(
                    chain_id = %req.chain_id,
                    payer_token = %req.payer_token,
                    payee_token = %req.payee_token,
                    input = %quote.input_amount,
                    output = %quote.output_amount,
                    provider = self.adapter.provider_name(),
                    "Swap route resolved"
                );
                RouteResult::from(quote)
            }
            Err(e) => {
                warn!(
                    chain_id = %req.chain_id,
                    payer_token = %req.payer_token,
                    payee_token = %req.payee_token,
                    error = %e,
                    "Swap route unavailable"
                );
                RouteResult::SwapUnavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

//! Public HTTP API.
//!
//! # Endpoints
//!
//! - `GET  /tokens?chain_id=N`  – tokens known on a chain
//! - `POST /quotes`             – raw swap quote
//! - `POST /payment-requests`   – create a payment request and resolve its route
//! - `POST /swaps`              – report a completed swap for the audit log

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use payroute_core::quote::QuoteError;
use payroute_sdk::objects::ErrorResponse;

use crate::state::AppState;

mod payment;
mod quote;
mod swaps;
mod tokens;

/// Build the API router, mounted under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tokens", get(tokens::list_tokens))
        .route("/quotes", post(quote::get_quote))
        .route("/payment-requests", post(payment::create_payment_request))
        .route("/swaps", post(swaps::report_swap))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
enum ApiError {
    /// The quote adapter failed.
    Quote(QuoteError),
    /// The request body is well-formed JSON but semantically invalid.
    BadRequest(String),
}

impl From<QuoteError> for ApiError {
    fn from(e: QuoteError) -> Self {
        ApiError::Quote(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, reason) = match self {
            ApiError::Quote(e) if e.is_invalid_input() => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Quote(e @ QuoteError::ProviderAuth(_)) => {
                tracing::error!(error = %e, "Aggregator rejected our credentials");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            ApiError::Quote(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
        };
        (status, Json(ErrorResponse { reason })).into_response()
    }
}

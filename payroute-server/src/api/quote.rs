use axum::{Json, extract::State, response::IntoResponse};
use payroute_sdk::objects::QuoteRequest;

use super::ApiError;
use crate::state::AppState;

/// `POST /quotes`: fetch a quote from the configured provider.
///
/// Unlike `/payment-requests`, failures are reported as errors rather than
/// folded into a route result.
pub(super) async fn get_quote(
    state: State<AppState>,
    Json(body): Json<QuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let selector = state.routing.snapshot().await.selector;
    let quote = selector.adapter().get_quote(&body).await?;
    Ok(Json(quote))
}

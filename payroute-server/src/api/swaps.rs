use axum::{Json, extract::State, http::StatusCode};
use payroute_sdk::objects::CompletedSwap;
use rust_decimal::Decimal;

use super::ApiError;
use crate::state::AppState;

/// `POST /swaps`: report a swap executed by the wallet platform.
///
/// The audit write happens in the background; the response does not wait
/// for it and does not reflect its outcome.
pub(super) async fn report_swap(
    state: State<AppState>,
    Json(body): Json<CompletedSwap>,
) -> Result<StatusCode, ApiError> {
    if body.input_amount <= Decimal::ZERO || body.output_amount <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "swap amounts must be positive".to_string(),
        ));
    }
    if body.from_token == body.to_token {
        return Err(ApiError::BadRequest(
            "a swap needs two different tokens".to_string(),
        ));
    }

    // Detached; the recorder logs its own failures.
    let _ = state.recorder.record_completed(body);
    Ok(StatusCode::ACCEPTED)
}

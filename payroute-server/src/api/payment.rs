use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use payroute_core::quote::parse_amount;
use payroute_sdk::objects::{
    CreatePaymentRequest, PaymentRequestResponse, RouteRequest, RouteResult,
};
use uuid::Uuid;

use super::ApiError;
use crate::state::AppState;

/// `POST /payment-requests`: create a payment request.
///
/// Resolves the route between the payer's and the payee's token. A swap that
/// cannot be quoted is still a successful response with `can_proceed = false`.
/// The amount must be a positive decimal on every route, direct included.
pub(super) async fn create_payment_request(
    state: State<AppState>,
    Json(body): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    parse_amount(&body.amount).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let selector = state.routing.snapshot().await.selector;
    let route = selector.select_route(&RouteRequest::from(&body)).await;
    let request_id = Uuid::now_v7();

    tracing::info!(
        %request_id,
        chain_id = %body.chain_id,
        can_proceed = route.can_proceed(),
        "Payment request created"
    );

    let response = PaymentRequestResponse {
        request_id,
        can_proceed: route.can_proceed(),
        message: describe(&route),
        route,
        memo: body.memo,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

fn describe(route: &RouteResult) -> String {
    match route {
        RouteResult::Direct { amount } => {
            format!("Payer and payee use the same token, {amount} is paid directly")
        }
        RouteResult::SwapResolved {
            input_amount,
            output_amount,
            route_hops,
            ..
        } => format!(
            "Swap {input_amount} into {output_amount} across {} route hop(s)",
            route_hops.len()
        ),
        RouteResult::SwapUnavailable { reason } => format!("Swap unavailable: {reason}"),
    }
}

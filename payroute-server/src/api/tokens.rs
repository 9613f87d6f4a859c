use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use payroute_sdk::objects::ListTokensQuery;

use crate::state::AppState;

/// `GET /tokens?chain_id=N`: list the tokens known on a chain, sorted by symbol.
///
/// An unknown chain yields an empty list.
pub(super) async fn list_tokens(
    state: State<AppState>,
    Query(query): Query<ListTokensQuery>,
) -> impl IntoResponse {
    let registry = state.routing.snapshot().await.registry;
    Json(registry.tokens_on(query.chain_id))
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::{Address, ChainId};
use super::route::{RouteRequest, RouteResult};

/// Request payload for creating a payment request.
///
/// The payee names the token they want to receive; the payer names the token
/// they intend to pay with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub chain_id: ChainId,
    pub payer_token: Address,
    pub payee_token: Address,
    /// Amount in human units of the payer token.
    pub amount: String,
    /// Wallet that will execute the payment (and the swap, if any).
    pub wallet_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl From<&CreatePaymentRequest> for RouteRequest {
    fn from(req: &CreatePaymentRequest) -> Self {
        RouteRequest {
            payer_token: req.payer_token.clone(),
            payee_token: req.payee_token.clone(),
            amount: req.amount.clone(),
            chain_id: req.chain_id,
            wallet_address: req.wallet_address.clone(),
        }
    }
}

/// Response of the "create payment request" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequestResponse {
    pub request_id: Uuid,
    pub route: RouteResult,
    /// Whether the payment can proceed as requested.
    pub can_proceed: bool,
    /// Human-readable summary of the route decision.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// A swap that the wallet platform has executed, reported for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSwap {
    pub chain_id: ChainId,
    pub wallet_address: Address,
    pub from_token: Address,
    pub to_token: Address,
    pub input_amount: Decimal,
    pub output_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Error body returned by the quote and payment endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub reason: String,
}

pub mod address;
pub mod payment;
pub mod route;
pub mod tokens;

pub use address::{Address, ChainId, NATIVE_TOKEN_ADDRESS};
pub use payment::{CompletedSwap, CreatePaymentRequest, ErrorResponse, PaymentRequestResponse};
pub use route::{Quote, QuoteRequest, RouteHop, RouteRequest, RouteResult};
pub use tokens::{ListTokensQuery, TokenInfo};

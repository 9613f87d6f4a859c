use serde::{Deserialize, Serialize};

use super::address::{Address, ChainId};

/// A token known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub chain_id: ChainId,
    pub address: Address,
    pub symbol: String,
    pub decimals: u32,
}

/// Query string of the token listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTokensQuery {
    pub chain_id: ChainId,
}

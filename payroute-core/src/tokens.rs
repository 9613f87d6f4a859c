//! Token registry.
//!
//! Maps `(chain, address)` to symbol and decimals. The sandbox provider
//! prices pairs by symbol; the live provider needs decimals to convert
//! between human amounts and base units.

use itertools::Itertools;
use lazy_static::lazy_static;
use payroute_sdk::objects::{Address, ChainId, NATIVE_TOKEN_ADDRESS, TokenInfo};
use std::collections::HashMap;

lazy_static! {
    static ref DEFAULT_TOKENS: Vec<TokenInfo> = {
        let erc20 = [
            // Ethereum
            (ChainId::ETHEREUM, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", 6),
            (ChainId::ETHEREUM, "0xdAC17F958D2ee523a2206206994597C13D831ec7", "USDT", 6),
            (ChainId::ETHEREUM, "0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI", 18),
            (ChainId::ETHEREUM, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "WETH", 18),
            // Sepolia
            (ChainId::SEPOLIA, "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238", "USDC", 6),
            (ChainId::SEPOLIA, "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14", "WETH", 18),
            // Base
            (ChainId::BASE, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", "USDC", 6),
            (ChainId::BASE, "0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb", "DAI", 18),
            (ChainId::BASE, "0x4200000000000000000000000000000000000006", "WETH", 18),
            // Base Sepolia
            (ChainId::BASE_SEPOLIA, "0x036CbD53842c5426634e7929541eC2318f3dCF7e", "USDC", 6),
            (ChainId::BASE_SEPOLIA, "0x4200000000000000000000000000000000000006", "WETH", 18),
        ];
        let chains = [
            ChainId::ETHEREUM,
            ChainId::SEPOLIA,
            ChainId::BASE,
            ChainId::BASE_SEPOLIA,
        ];
        chains
            .into_iter()
            .map(|chain_id| TokenInfo {
                chain_id,
                address: Address::new(NATIVE_TOKEN_ADDRESS),
                symbol: "ETH".to_string(),
                decimals: 18,
            })
            .chain(erc20.into_iter().map(|(chain_id, address, symbol, decimals)| TokenInfo {
                chain_id,
                address: Address::new(address),
                symbol: symbol.to_string(),
                decimals,
            }))
            .collect()
    };
}

/// Known tokens, indexed by chain and case-insensitive address.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<(ChainId, Address), TokenInfo>,
}

impl TokenRegistry {
    pub fn new(tokens: impl IntoIterator<Item = TokenInfo>) -> Self {
        Self::default().with_extra(tokens)
    }

    /// The built-in token list.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_TOKENS.iter().cloned())
    }

    /// Add tokens, replacing any existing entry for the same chain and address.
    pub fn with_extra(mut self, tokens: impl IntoIterator<Item = TokenInfo>) -> Self {
        for token in tokens {
            self.tokens
                .insert((token.chain_id, token.address.clone()), token);
        }
        self
    }

    pub fn lookup(&self, chain_id: ChainId, address: &Address) -> Option<&TokenInfo> {
        self.tokens.get(&(chain_id, address.clone()))
    }

    /// Tokens on one chain, sorted by symbol.
    pub fn tokens_on(&self, chain_id: ChainId) -> Vec<TokenInfo> {
        self.tokens
            .values()
            .filter(|token| token.chain_id == chain_id)
            .sorted_by(|a, b| a.symbol.cmp(&b.symbol))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_address_case() {
        let registry = TokenRegistry::with_defaults();
        let usdc = registry
            .lookup(
                ChainId::ETHEREUM,
                &Address::new("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            )
            .unwrap();
        assert_eq!(usdc.symbol, "USDC");
        assert_eq!(usdc.decimals, 6);
    }

    #[test]
    fn test_native_token_on_every_default_chain() {
        let registry = TokenRegistry::with_defaults();
        for chain in [
            ChainId::ETHEREUM,
            ChainId::SEPOLIA,
            ChainId::BASE,
            ChainId::BASE_SEPOLIA,
        ] {
            let eth = registry
                .lookup(chain, &Address::new(NATIVE_TOKEN_ADDRESS))
                .unwrap();
            assert_eq!(eth.symbol, "ETH");
        }
        assert!(
            registry
                .lookup(ChainId(137), &Address::new(NATIVE_TOKEN_ADDRESS))
                .is_none()
        );
    }

    #[test]
    fn test_extra_tokens_override_defaults() {
        let registry = TokenRegistry::with_defaults().with_extra([TokenInfo {
            chain_id: ChainId::BASE,
            address: Address::new("0x833589FCD6EDB6E08F4C7C32D4F71B54BDA02913"),
            symbol: "USDbC".to_string(),
            decimals: 6,
        }]);
        let token = registry
            .lookup(
                ChainId::BASE,
                &Address::new("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            )
            .unwrap();
        assert_eq!(token.symbol, "USDbC");
    }

    #[test]
    fn test_tokens_on_is_sorted_and_scoped() {
        let registry = TokenRegistry::with_defaults();
        let symbols: Vec<_> = registry
            .tokens_on(ChainId::ETHEREUM)
            .into_iter()
            .map(|t| t.symbol)
            .collect();
        assert_eq!(symbols, vec!["DAI", "ETH", "USDC", "USDT", "WETH"]);
    }
}

//! Sandbox quote table.
//!
//! The rates and fee are placeholder demo values, not market prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One directed conversion rate: 1 unit of `from` buys `rate` units of `to`
/// before fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxRate {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
}

impl SandboxRate {
    pub fn new(from: &str, to: &str, rate: Decimal) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Proportional fee taken from the output amount (0.003 = 0.3%).
    pub fee_rate: Decimal,
    /// Gas estimate reported on every sandbox quote.
    pub estimated_gas: u64,
    pub rates: Vec<SandboxRate>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            fee_rate: Decimal::new(3, 3),
            estimated_gas: 150_000,
            rates: default_rates(),
        }
    }
}

/// The built-in pair table, keyed by token symbol.
pub fn default_rates() -> Vec<SandboxRate> {
    let eth_price = Decimal::from(2500);
    let eth_per_usd = Decimal::new(4, 4);
    let stable = Decimal::new(999, 3);

    let mut rates = vec![
        SandboxRate::new("ETH", "USDC", eth_price),
        SandboxRate::new("ETH", "USDT", eth_price),
        SandboxRate::new("ETH", "DAI", eth_price),
        SandboxRate::new("WETH", "USDC", eth_price),
        SandboxRate::new("USDC", "ETH", eth_per_usd),
        SandboxRate::new("USDT", "ETH", eth_per_usd),
        SandboxRate::new("DAI", "ETH", eth_per_usd),
        SandboxRate::new("USDC", "WETH", eth_per_usd),
        SandboxRate::new("ETH", "WETH", Decimal::ONE),
        SandboxRate::new("WETH", "ETH", Decimal::ONE),
    ];
    for (a, b) in [("USDC", "USDT"), ("USDC", "DAI"), ("USDT", "DAI")] {
        rates.push(SandboxRate::new(a, b, stable));
        rates.push(SandboxRate::new(b, a, stable));
    }
    rates
}

//! Configuration types for PayRoute.
//!
//! These types represent the validated runtime configuration handed to the
//! route selector and quote providers. Reading files and the environment is
//! the server crate's job; nothing in this crate touches process state.

mod aggregator;
mod config_store;
mod sandbox;

pub use aggregator::{
    AggregatorConfig, DEFAULT_AGGREGATOR_BASE_URL, DEFAULT_QUOTE_TIMEOUT, ProviderCredentials,
    QuoteMode, default_slippage,
};
pub use config_store::ConfigStore;
pub use sandbox::{SandboxConfig, SandboxRate};

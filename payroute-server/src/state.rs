//! Application state shared across all request handlers.

use crate::config::LoadedConfig;
use payroute_core::audit::SwapRecorder;
use payroute_core::config::ConfigStore;
use payroute_core::quote::ProviderBuildError;
use payroute_core::route::RouteSelector;
use payroute_core::tokens::TokenRegistry;
use std::sync::Arc;

/// Selector and registry built from the same configuration.
///
/// Kept in a single store so a reload replaces both at once.
#[derive(Clone)]
pub struct Routing {
    pub selector: Arc<RouteSelector>,
    pub registry: Arc<TokenRegistry>,
}

impl Routing {
    pub fn from_config(config: &LoadedConfig) -> Result<Self, ProviderBuildError> {
        let registry = Arc::new(TokenRegistry::with_defaults().with_extra(config.tokens.clone()));
        let selector = RouteSelector::from_config(&config.aggregator, Arc::clone(&registry))?;
        tracing::info!(
            provider = selector.adapter().provider_name(),
            tokens = registry.len(),
            "Route selector built"
        );
        Ok(Self {
            selector: Arc::new(selector),
            registry,
        })
    }
}

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Handlers take a snapshot of the routing components, so a SIGHUP reload
/// never affects a request that is already running.
#[derive(Clone)]
pub struct AppState {
    pub routing: ConfigStore<Routing>,
    pub recorder: SwapRecorder,
}

impl AppState {
    pub fn new(config: &LoadedConfig, recorder: SwapRecorder) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            routing: ConfigStore::new(Routing::from_config(config)?),
            recorder,
        })
    }

    /// Swap in components built from a reloaded configuration.
    ///
    /// On error the current components stay in place.
    pub async fn apply(&self, config: &LoadedConfig) -> Result<(), ProviderBuildError> {
        let routing = Routing::from_config(config)?;
        self.routing.update(routing).await;
        Ok(())
    }
}

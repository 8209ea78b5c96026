use crate::config::GatewayConfig;
use crate::storage::KeyValueStore;

/// Shared gateway state.
pub struct AppState {
    pub config: GatewayConfig,
    /// Client for the claims backend, reused across requests.
    pub upstream: reqwest::Client,
    /// Key-value store selected once at startup by the hosting environment.
    pub store: Box<dyn KeyValueStore>,
}

impl AppState {
    pub fn new(config: GatewayConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            config,
            upstream: reqwest::Client::new(),
            store,
        }
    }
}

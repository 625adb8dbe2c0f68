//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::{RedirectService, ShortenerService, StatsService};
use crate::config::Config;
use crate::domain::store::LinkStore;
use crate::utils::RandomCodeGenerator;

/// Application state shared across all request handlers.
///
/// Services are wired once at startup against a single link store and shared
/// via [`Arc`], so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shortener_service: Arc<ShortenerService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    pub store: Arc<dyn LinkStore>,
    pub base_url: String,
    pub instance_id: String,
}

impl AppState {
    /// Wires the service graph over `store` using settings from `config`.
    pub fn new(store: Arc<dyn LinkStore>, config: &Config) -> Self {
        let generator = Arc::new(RandomCodeGenerator::new(config.code_length));

        Self {
            shortener_service: Arc::new(ShortenerService::new(store.clone(), generator)),
            redirect_service: Arc::new(RedirectService::new(store.clone())),
            stats_service: Arc::new(StatsService::new(store.clone())),
            store,
            base_url: config.base_url.clone(),
            instance_id: config.instance_id.clone(),
        }
    }

    /// Renders the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::search::provider::{SearchProvider, SerpApiClient};
use crate::store::SchoolStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<SchoolStore>,
    pub search: Arc<dyn SearchProvider>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store = SchoolStore::open_or_create(&config.db_path())?;

        let client = SerpApiClient::new(config.search.clone())?;
        if !client.has_credentials() {
            tracing::warn!("SERPAPI_KEY not set: web recommendations will be empty");
        }

        Ok(Self::with_parts(config, Arc::new(store), Arc::new(client)))
    }

    /// Assemble state from already-built parts (e.g. a fake search provider).
    pub fn with_parts(
        config: Config,
        store: Arc<SchoolStore>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            config,
            store,
            search,
        }
    }
}

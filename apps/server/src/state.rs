//! Shared application state

use std::sync::Arc;

use crate::config::Config;
use crate::services::ItemCatalog;

/// State handed to every handler and middleware.
///
/// Everything in here is read-only after startup; cloning is a pair of
/// reference-count increments.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<ItemCatalog>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_catalog(config, ItemCatalog::with_samples())
    }

    pub fn with_catalog(config: Config, catalog: ItemCatalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }
}

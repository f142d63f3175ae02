use super::ApiError;
use crate::config::Config;
use crate::store::DocumentStore;
use std::sync::Arc;

// Shared state
#[derive(Clone)]
pub struct AppState {
    /// `None` when the database isn't configured.
    pub store: Option<Arc<dyn DocumentStore>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> Result<&dyn DocumentStore, ApiError> {
        self.store.as_deref().ok_or(ApiError::Unavailable)
    }
}

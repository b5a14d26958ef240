//! Application state.

use std::sync::Arc;

use framewatch_store::AnalysisStore;

use crate::config::ApiConfig;

/// Shared application state.
///
/// No request mutates it: all persistent state lives on the filesystem
/// and directories are re-scanned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub store: Arc<AnalysisStore>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Self {
        let store = AnalysisStore::new(&config.output_dir);
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

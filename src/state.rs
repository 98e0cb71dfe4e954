use std::sync::Arc;

use crate::application::services::SearchService;

/// Shared state injected into every handler.
///
/// The search service owns the cache and provider handles; nothing here is
/// process-global.
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
}

impl AppState {
    pub fn new(search_service: Arc<SearchService>) -> Self {
        Self { search_service }
    }
}

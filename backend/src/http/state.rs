//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::SongRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Song store used by every endpoint
    pub repository: Arc<dyn SongRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn SongRepository>) -> Self {
        Self { repository }
    }
}

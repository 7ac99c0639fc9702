//! Application state shared across handlers

use auth::SessionManager;
use store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub sessions: SessionManager,
}

//! Application state shared across handlers

use bankline_auth::AuthService;
use bankline_db::AccountStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Account directory
    pub store: Arc<dyn AccountStore>,
    /// Authentication service
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn AccountStore>, auth: Arc<AuthService>) -> Self {
        Self { store, auth }
    }
}

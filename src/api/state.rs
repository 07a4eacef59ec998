//! Application state shared across handlers.

use std::sync::Arc;

use crate::service::ValueService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Counter and message operations.
    pub values: Arc<ValueService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(values: ValueService) -> Self {
        Self {
            values: Arc::new(values),
        }
    }
}

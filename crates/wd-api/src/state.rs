//! Application state shared across handlers.

use std::sync::Arc;
use wd_core::db::DbPool;
use wd_notify::Notifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<DbPool>,
    /// Outbound notification dispatcher.
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(db: DbPool, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db: Arc::new(db),
            notifier,
        }
    }
}

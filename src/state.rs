//! Application state management.

use crate::config::Config;
use crate::db::DatabasePool;
use crate::status::StateStore;
use crate::warning::{WarningLog, WarningSink};
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Container registry and change notifications.
    pub store: Arc<StateStore>,
    /// Warning log, also the sink for `warning` status updates.
    pub warnings: Arc<WarningLog>,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new application state with default configuration and no database.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(Config::default(), None)
    }

    /// Creates a new application state from configuration.
    #[must_use]
    pub fn from_config(config: Config, db: Option<DatabasePool>) -> Self {
        let capacity = config.notifications.channel_capacity;
        let warnings = Arc::new(WarningLog::new(capacity, config.warnings.retention, db));
        let sink: Arc<dyn WarningSink> = warnings.clone();
        let store = Arc::new(StateStore::new(capacity, sink));

        Self {
            store,
            warnings,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

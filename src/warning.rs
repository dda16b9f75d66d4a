//! Warning log.
//!
//! Warnings arrive either through the warning endpoint or as the side
//! channel of a `warning` status update. Each recorded warning gets an
//! id and a timestamp, is kept in memory, fanned out to WebSocket
//! subscribers and, when a database is configured, persisted in the
//! background.

use crate::db::DatabasePool;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use utoipa::{IntoParams, ToSchema};


/// A warning that has not been recorded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewWarning {
    /// Component that raised the warning.
    #[serde(default)]
    pub origin: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Structured reference payload.
    #[serde(rename = "ref", default)]
    #[schema(value_type = Object)]
    pub reference: Value,
}

/// A recorded warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Warning {
    /// Warning identifier.
    pub id: u64,
    /// Time the warning was recorded.
    #[schema(value_type = String)]
    pub time: DateTime<Utc>,
    /// Component that raised the warning.
    pub origin: String,
    /// Human-readable message.
    pub message: String,
    /// Structured reference payload.
    #[serde(rename = "ref")]
    #[schema(value_type = Object)]
    pub reference: Value,
}

/// Filter for listing warnings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WarningFilter {
    /// Exact origin to match.
    #[serde(default)]
    pub origin: Option<String>,
    /// Substring the message must contain.
    #[serde(default)]
    pub message: Option<String>,
}

impl WarningFilter {
    /// Whether `warning` passes this filter.
    #[must_use]
    pub fn matches(&self, warning: &Warning) -> bool {
        let origin_ok = self
            .origin
            .as_deref()
            .is_none_or(|origin| warning.origin == origin);
        let message_ok = self
            .message
            .as_deref()
            .is_none_or(|needle| warning.message.contains(needle));
        origin_ok && message_ok
    }
}

/// Destination for warnings raised by status updates.
pub trait WarningSink: Send + Sync {
    /// Records a warning and returns it with its assigned id.
    fn record(&self, warning: NewWarning) -> Warning;
}

/// In-memory warning log with broadcast and optional persistence.
pub struct WarningLog {
    entries: RwLock<VecDeque<Warning>>,
    retention: usize,
    next_id: AtomicU64,
    events: broadcast::Sender<Warning>,
    db: Option<DatabasePool>,
}

impl WarningLog {
    /// Creates an empty log.
    ///
    /// # Arguments
    /// * `capacity` - Broadcast buffer size per subscriber
    /// * `retention` - Warnings kept in memory; the oldest are evicted first
    /// * `db` - Optional database pool for persistence
    #[must_use]
    pub fn new(capacity: usize, retention: usize, db: Option<DatabasePool>) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            entries: RwLock::new(VecDeque::new()),
            retention: retention.max(1),
            next_id: AtomicU64::new(1),
            events,
            db,
        }
    }

    /// Replaces the log content with previously persisted warnings.
    ///
    /// New ids continue after the highest restored one. Only the newest
    /// `retention` warnings are kept.
    pub fn restore(&self, warnings: Vec<Warning>) {
        let next = warnings.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let skip = warnings.len().saturating_sub(self.retention);
        *self.entries.write() = warnings.into_iter().skip(skip).collect();
        self.next_id.store(next, Ordering::SeqCst);
    }

    /// Returns a receiver for newly recorded warnings.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Warning> {
        self.events.subscribe()
    }

    /// Lists warnings matching `filter`, oldest first.
    #[must_use]
    pub fn list(&self, filter: &WarningFilter) -> Vec<Warning> {
        self.entries
            .read()
            .iter()
            .filter(|warning| filter.matches(warning))
            .cloned()
            .collect()
    }

    /// Gets a warning by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<Warning> {
        self.entries.read().iter().find(|w| w.id == id).cloned()
    }

    /// Number of recorded warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no warning has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn persist(&self, warning: &Warning) {
        let Some(db) = self.db.clone() else {
            return;
        };
        let warning = warning.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = db.insert_warning(&warning).await {
                        warn!("Failed to persist warning {}: {}", warning.id, e);
                    }
                });
            }
            Err(_) => warn!("No runtime available, warning {} not persisted", warning.id),
        }
    }
}

impl WarningSink for WarningLog {
    fn record(&self, warning: NewWarning) -> Warning {
        let recorded = Warning {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            time: Utc::now(),
            origin: warning.origin,
            message: warning.message,
            reference: warning.reference,
        };

        {
            let mut entries = self.entries.write();
            entries.push_back(recorded.clone());
            while entries.len() > self.retention {
                entries.pop_front();
            }
        }
        debug!("Recorded warning {} from {}", recorded.id, recorded.origin);

        let _ = self.events.send(recorded.clone());
        self.persist(&recorded);

        recorded
    }
}

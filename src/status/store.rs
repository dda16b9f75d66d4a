//! Container registry and update dispatch.

use super::builder::{nest, parse};
use super::diff::change_values;
use super::error::StateError;
use super::path::PathKey;
use super::projector::retrieve_paths;
use super::tree::StateTree;
use super::{ChangeSet, FlatState};
use crate::warning::{NewWarning, Warning, WarningSink};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast;


/// Kind of a status update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    /// Plain state update.
    Info,
    /// State update that also raises the carried warning.
    Warning(NewWarning),
}

/// Events published to change subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// Paths of a container were added or altered.
    Changed {
        /// Container name.
        container: String,
        /// The change-set re-nested as a tree.
        states: Value,
    },
    /// Every container was dropped.
    Cleared,
}

/// Result of [`StateStore::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    /// Paths whose value was added or altered.
    pub changed: ChangeSet,
    /// Whether the update created the container.
    pub created: bool,
    /// Prefixes where a leaf was overwritten by a sub-tree.
    pub collisions: Vec<String>,
    /// Warning raised by a `warning` update.
    pub warning: Option<Warning>,
}

/// Registry of container trees.
///
/// Updates hold the write lock for the whole merge and its notification,
/// so readers never see a tree mid-mutation and subscribers receive
/// changes in commit order. Sending never blocks; slow subscribers drop
/// messages.
pub struct StateStore {
    containers: RwLock<BTreeMap<String, StateTree>>,
    events: broadcast::Sender<StatusEvent>,
    warnings: Arc<dyn WarningSink>,
}

impl StateStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Broadcast buffer size per subscriber
    /// * `warnings` - Sink receiving warnings raised by updates
    #[must_use]
    pub fn new(capacity: usize, warnings: Arc<dyn WarningSink>) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            containers: RwLock::new(BTreeMap::new()),
            events,
            warnings,
        }
    }

    /// Returns a receiver for change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.events.subscribe()
    }

    /// Whether `container` is tracked.
    #[must_use]
    pub fn contains(&self, container: &str) -> bool {
        self.containers.read().contains_key(container)
    }

    /// Renders every tracked container.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` if a tree is corrupt.
    pub fn list_all(&self) -> Result<BTreeMap<String, Value>, StateError> {
        self.containers
            .read()
            .iter()
            .map(|(name, tree)| Ok((name.clone(), tree.to_value()?)))
            .collect()
    }

    /// Renders one container.
    ///
    /// # Errors
    /// Returns `NotFound` if the container is not tracked.
    pub fn get(&self, container: &str) -> Result<Value, StateError> {
        let containers = self.containers.read();
        let tree = containers
            .get(container)
            .ok_or_else(|| StateError::NotFound(container.to_string()))?;
        tree.to_value()
    }

    /// Renders only the requested paths of one container.
    ///
    /// # Errors
    /// Returns `NotFound` if the container is not tracked.
    pub fn get_paths(&self, container: &str, paths: &[PathKey]) -> Result<Value, StateError> {
        let containers = self.containers.read();
        let tree = containers
            .get(container)
            .ok_or_else(|| StateError::NotFound(container.to_string()))?;
        retrieve_paths(tree, paths)?.to_value()
    }

    /// Applies a flat update to `container`, creating it if needed.
    ///
    /// A new container reports every entry as changed. An existing one
    /// reports only what actually changed, and an empty change-set
    /// publishes nothing. A `warning` update forwards its warning to the
    /// sink whether or not any value changed.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `flat` is empty.
    pub fn apply(
        &self,
        container: &str,
        flat: &FlatState,
        kind: UpdateKind,
    ) -> Result<ApplyOutcome, StateError> {
        if flat.is_empty() {
            return Err(StateError::InvalidInput(format!(
                "update for container {} carries no data",
                container
            )));
        }

        let mut outcome = {
            let mut containers = self.containers.write();
            let outcome = match containers.get_mut(container) {
                Some(tree) => {
                    let diff = change_values(tree, flat)?;
                    ApplyOutcome {
                        changed: diff.changed,
                        collisions: diff.collisions,
                        ..ApplyOutcome::default()
                    }
                }
                None => {
                    containers.extend(parse(flat, container)?);
                    ApplyOutcome {
                        changed: flat.clone(),
                        created: true,
                        ..ApplyOutcome::default()
                    }
                }
            };
            if !outcome.changed.is_empty() {
                self.publish(container, &outcome.changed);
            }
            outcome
        };

        if let UpdateKind::Warning(warning) = kind {
            outcome.warning = Some(self.warnings.record(warning));
        }

        Ok(outcome)
    }

    /// Drops every container and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut containers = self.containers.write();
        let dropped = containers.len();
        containers.clear();
        let _ = self.events.send(StatusEvent::Cleared);
        dropped
    }

    fn publish(&self, container: &str, changed: &ChangeSet) {
        let _ = self.events.send(StatusEvent::Changed {
            container: container.to_string(),
            states: nest(changed),
        });
    }
}

//! Failures raised by the status engine.

use thiserror::Error;

/// Status engine error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The update carried nothing to apply.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The container is not tracked.
    #[error("container not found: {0}")]
    NotFound(String),

    /// A node handle did not address a live node of the tree.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

//! Applies flat updates to an existing tree and reports what changed.

use super::builder::graft;
use super::error::StateError;
use super::path::PathKey;
use super::tree::{StateNode, StateTree};
use super::{ChangeSet, FlatState};

/// Result of [`change_values`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOutcome {
    /// Paths whose value was added or altered, with their new value.
    pub changed: ChangeSet,
    /// Prefixes where a leaf stood in the way of a deeper path and was
    /// overwritten by a sub-tree.
    pub collisions: Vec<String>,
}

/// Merges `flat` into `tree` in place.
///
/// Existing nodes are compared against the new value and only rewritten
/// when they differ; missing suffixes are grafted. Branches not named by
/// `flat` keep their nodes and handles.
///
/// Entries are applied in key order. A failure leaves the entries before
/// it applied.
///
/// # Errors
/// Returns `InternalInconsistency` if the tree holds a dangling handle.
pub fn change_values(tree: &mut StateTree, flat: &FlatState) -> Result<DiffOutcome, StateError> {
    let mut outcome = DiffOutcome::default();

    for (raw, value) in flat {
        let path = PathKey::parse(raw);
        let walk = tree.walk(&path)?;

        if walk.depth == path.len() {
            let differs = match tree.node(walk.node)? {
                StateNode::Leaf(current) => current != value,
                StateNode::Internal(_) => tree.value_of(walk.node)? != *value,
            };
            if differs {
                tree.replace(walk.node, StateNode::Leaf(value.clone()))?;
                outcome.changed.insert(raw.clone(), value.clone());
            }
        } else {
            if graft(tree, walk, &path, value.clone())? {
                outcome.collisions.push(path.prefix(walk.depth).to_string());
            }
            outcome.changed.insert(raw.clone(), value.clone());
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests;

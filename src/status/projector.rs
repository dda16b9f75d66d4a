//! Selective sub-path projection.

use super::error::StateError;
use super::path::PathKey;
use super::tree::{StateNode, StateTree};

/// Copies only the requested leaves and sub-trees of `tree` into a new
/// tree, recreating just the ancestors needed to hold them.
///
/// Paths sharing ancestors accumulate as siblings. Paths that do not
/// exist in `tree` are left out of the result.
///
/// # Errors
/// Returns `InternalInconsistency` if `tree` holds a dangling handle.
pub fn retrieve_paths(tree: &StateTree, paths: &[PathKey]) -> Result<StateTree, StateError> {
    let mut projection = StateTree::new();

    for path in paths {
        let Some(source) = tree.resolve(path)? else {
            continue;
        };
        let Some((last, ancestors)) = path.segments().split_last() else {
            continue;
        };

        let mut parent = projection.root();
        for segment in ancestors {
            parent = match projection.child(parent, segment)? {
                Some(existing) if !projection.node(existing)?.is_leaf() => existing,
                _ => {
                    let created = projection.alloc(StateNode::internal());
                    projection.insert_child(parent, segment.clone(), created)?;
                    created
                }
            };
        }

        let copy = projection.import(tree, source)?;
        projection.insert_child(parent, last.clone(), copy)?;
    }

    Ok(projection)
}

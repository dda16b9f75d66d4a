//! Materializes flat path updates into nested trees.

use super::error::StateError;
use super::path::PathKey;
use super::tree::{NodeId, StateNode, StateTree, Walk};
use super::FlatState;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds a fresh tree from a flat `path -> value` mapping.
///
/// The result holds a single entry keyed by `container`, ready to be
/// merged into a registry or published as is.
///
/// # Errors
/// Returns `InvalidInput` if `flat` is empty.
pub fn parse(
    flat: &FlatState,
    container: &str,
) -> Result<BTreeMap<String, StateTree>, StateError> {
    if flat.is_empty() {
        return Err(StateError::InvalidInput(format!(
            "no data to materialize for container {}",
            container
        )));
    }

    let mut tree = StateTree::new();
    for (raw, value) in flat {
        let path = PathKey::parse(raw);
        let walk = tree.walk(&path)?;
        if walk.depth == path.len() {
            tree.replace(walk.node, StateNode::Leaf(value.clone()))?;
        } else {
            graft(&mut tree, walk, &path, value.clone())?;
        }
    }

    Ok(BTreeMap::from([(container.to_string(), tree)]))
}

/// Attaches the missing suffix of `path` below the node reached by `walk`.
///
/// A single missing segment becomes a leaf directly under the anchor.
/// Longer suffixes are built as a detached chain first and spliced in as
/// one child, leaving the anchor's other children alone. Returns `true`
/// when the anchor was a leaf and got overwritten.
pub(crate) fn graft(
    tree: &mut StateTree,
    walk: Walk,
    path: &PathKey,
    value: Value,
) -> Result<bool, StateError> {
    let missing = path.segments().get(walk.depth..).unwrap_or_default();
    let Some((first, rest)) = missing.split_first() else {
        return Err(StateError::InternalInconsistency(format!(
            "nothing left to graft for {}",
            path
        )));
    };

    let chain = build_chain(tree, rest, value);
    tree.insert_child(walk.node, first.clone(), chain)
}

/// Renders a flat mapping as nested JSON with the same merge rules as
/// [`parse`]: a value standing where a deeper path needs an object is
/// replaced by that object.
///
/// Works on plain JSON objects and cannot fail, so it is safe to call
/// after an update has been committed.
#[must_use]
pub fn nest(flat: &FlatState) -> Value {
    let mut root = Map::new();

    'entries: for (raw, value) in flat {
        let path = PathKey::parse(raw);
        let Some((last, parents)) = path.segments().split_last() else {
            continue;
        };

        let mut node = &mut root;
        for segment in parents {
            let entry = node
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            match entry.as_object_mut() {
                Some(map) => node = map,
                None => continue 'entries,
            }
        }
        node.insert(last.clone(), value.clone());
    }

    Value::Object(root)
}

fn build_chain(tree: &mut StateTree, segments: &[String], value: Value) -> NodeId {
    let mut node = tree.alloc(StateNode::Leaf(value));
    for segment in segments.iter().rev() {
        node = tree.alloc(StateNode::Internal(BTreeMap::from([(
            segment.clone(),
            node,
        )])));
    }
    node
}

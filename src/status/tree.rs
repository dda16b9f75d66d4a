//! Arena-backed state trees.
//!
//! Each container owns one [`StateTree`]. Nodes live in a slot vector and
//! refer to their children through [`NodeId`] handles, so updates can
//! rewrite a single node in place while every untouched branch keeps its
//! handle. Slots freed by overwritten sub-trees are recycled.

use super::error::StateError;
use super::path::PathKey;
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Handle of a node inside a [`StateTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A node of a state tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StateNode {
    /// A stored value. Objects and arrays are kept verbatim and never
    /// addressed by path segments.
    Leaf(Value),
    /// Named children.
    Internal(BTreeMap<String, NodeId>),
}

impl StateNode {
    /// Empty internal node.
    #[must_use]
    pub fn internal() -> Self {
        StateNode::Internal(BTreeMap::new())
    }

    /// Whether this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, StateNode::Leaf(_))
    }
}

/// Result of walking a path as far as it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    /// Deepest node reached.
    pub node: NodeId,
    /// Number of path segments consumed to reach `node`.
    pub depth: usize,
}

/// Nested state of a single container.
#[derive(Debug, Clone)]
pub struct StateTree {
    slots: Vec<Option<StateNode>>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl StateTree {
    /// Creates a tree holding an empty internal root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Some(StateNode::internal())],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Handle of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the root has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.node(self.root), Ok(StateNode::Internal(children)) if children.is_empty())
    }

    /// Returns the node addressed by `id`.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` if `id` is not a live node.
    pub fn node(&self, id: NodeId) -> Result<&StateNode, StateError> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| stale(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut StateNode, StateError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| stale(id))
    }

    /// Stores a detached node and returns its handle.
    pub(crate) fn alloc(&mut self, node: StateNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Frees `id` and everything below it.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(slot) = self.slots.get_mut(next.0)
                && let Some(node) = slot.take()
            {
                if let StateNode::Internal(children) = node {
                    pending.extend(children.into_values());
                }
                self.free.push(next);
            }
        }
    }

    /// Empties the slot at `id` while its parent still links to it.
    #[cfg(test)]
    pub(crate) fn drop_slot(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Child of `parent` named `name`, if `parent` is internal and has one.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` if `parent` is not a live node.
    pub fn child(&self, parent: NodeId, name: &str) -> Result<Option<NodeId>, StateError> {
        match self.node(parent)? {
            StateNode::Internal(children) => Ok(children.get(name).copied()),
            StateNode::Leaf(_) => Ok(None),
        }
    }

    /// Follows `path` from the root while matching children exist.
    ///
    /// The walk stops at the first absent segment or at a leaf.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` on a dangling child handle.
    pub fn walk(&self, path: &PathKey) -> Result<Walk, StateError> {
        let mut walk = Walk {
            node: self.root,
            depth: 0,
        };
        for segment in path.segments() {
            match self.child(walk.node, segment)? {
                Some(next) => {
                    walk.node = next;
                    walk.depth += 1;
                }
                None => break,
            }
        }
        Ok(walk)
    }

    /// Handle of the node at exactly `path`.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` on a dangling child handle.
    pub fn resolve(&self, path: &PathKey) -> Result<Option<NodeId>, StateError> {
        let walk = self.walk(path)?;
        Ok((walk.depth == path.len()).then_some(walk.node))
    }

    /// Overwrites the node at `id`, freeing whatever it held before.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` if `id` is not a live node.
    pub fn replace(&mut self, id: NodeId, node: StateNode) -> Result<(), StateError> {
        let old = std::mem::replace(self.node_mut(id)?, node);
        if let StateNode::Internal(children) = old {
            for child in children.into_values() {
                self.release(child);
            }
        }
        Ok(())
    }

    /// Attaches `child` under `parent` as `name`.
    ///
    /// An existing child of that name is freed. A leaf parent is turned
    /// into an internal node, dropping its value; the return value tells
    /// whether that happened.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` if `parent` is not a live node.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        name: String,
        child: NodeId,
    ) -> Result<bool, StateError> {
        let node = self.node_mut(parent)?;
        if node.is_leaf() {
            *node = StateNode::Internal(BTreeMap::from([(name, child)]));
            return Ok(true);
        }
        let displaced = match node {
            StateNode::Internal(children) => children.insert(name, child),
            StateNode::Leaf(_) => None,
        };
        if let Some(old) = displaced {
            self.release(old);
        }
        Ok(false)
    }

    /// Deep-copies the sub-tree at `id` of `source` into this arena.
    ///
    /// The copy is detached; attach it with [`StateTree::insert_child`].
    ///
    /// # Errors
    /// Returns `InternalInconsistency` on a dangling handle in `source`.
    pub fn import(&mut self, source: &StateTree, id: NodeId) -> Result<NodeId, StateError> {
        match source.node(id)? {
            StateNode::Leaf(value) => Ok(self.alloc(StateNode::Leaf(value.clone()))),
            StateNode::Internal(children) => {
                let mut copied = BTreeMap::new();
                for (name, &child) in children {
                    copied.insert(name.clone(), self.import(source, child)?);
                }
                Ok(self.alloc(StateNode::Internal(copied)))
            }
        }
    }

    /// Renders the sub-tree at `id` as nested JSON.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` on a dangling handle.
    pub fn value_of(&self, id: NodeId) -> Result<Value, StateError> {
        match self.node(id)? {
            StateNode::Leaf(value) => Ok(value.clone()),
            StateNode::Internal(children) => {
                let mut map = Map::new();
                for (name, &child) in children {
                    map.insert(name.clone(), self.value_of(child)?);
                }
                Ok(Value::Object(map))
            }
        }
    }

    /// Renders the whole tree as nested JSON.
    ///
    /// # Errors
    /// Returns `InternalInconsistency` on a dangling handle.
    pub fn to_value(&self) -> Result<Value, StateError> {
        self.value_of(self.root)
    }
}

impl Default for StateTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for StateTree {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_value(), other.to_value()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

fn stale(id: NodeId) -> StateError {
    StateError::InternalInconsistency(format!("node {} is not live", id.0))
}

struct NodeView<'a> {
    tree: &'a StateTree,
    id: NodeId,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.tree.node(self.id).map_err(S::Error::custom)? {
            StateNode::Leaf(value) => value.serialize(serializer),
            StateNode::Internal(children) => serializer.collect_map(children.iter().map(
                |(name, &id)| {
                    (
                        name,
                        NodeView {
                            tree: self.tree,
                            id,
                        },
                    )
                },
            )),
        }
    }
}

impl Serialize for StateTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView {
            tree: self,
            id: self.root,
        }
        .serialize(serializer)
    }
}

//! Unit tests for the diff engine.

use super::*;
use crate::status::builder::parse;
use serde_json::{Value, json};

fn flat(value: Value) -> FlatState {
    serde_json::from_value(value).unwrap()
}

fn tree_of(value: Value) -> StateTree {
    let mut result = parse(&flat(value), "c").unwrap();
    result.remove("c").unwrap()
}

// ============================================================================
// Change Detection
// ============================================================================

#[test]
fn test_only_changed_values_are_reported() {
    let mut tree = tree_of(json!({"a": 1, "b": 2}));

    let outcome = change_values(&mut tree, &flat(json!({"a": 1, "b": 3}))).unwrap();

    assert_eq!(outcome.changed, flat(json!({"b": 3})));
    assert!(outcome.collisions.is_empty());
    assert_eq!(tree.to_value().unwrap(), json!({"a": 1, "b": 3}));
}

#[test]
fn test_identical_update_is_empty() {
    let data = flat(json!({"data1": 1, "subdata/sub1": "val1", "subdata/sub2": true}));
    let mut tree = StateTree::new();

    let first = change_values(&mut tree, &data).unwrap();
    assert_eq!(first.changed.len(), 3);

    let second = change_values(&mut tree, &data).unwrap();
    assert!(second.changed.is_empty());
}

#[test]
fn test_empty_update_is_noop() {
    let mut tree = tree_of(json!({"a": 1}));
    let outcome = change_values(&mut tree, &FlatState::new()).unwrap();

    assert_eq!(outcome, DiffOutcome::default());
    assert_eq!(tree.to_value().unwrap(), json!({"a": 1}));
}

#[test]
fn test_type_change_counts_as_change() {
    let mut tree = tree_of(json!({"a": 1}));
    let outcome = change_values(&mut tree, &flat(json!({"a": "1"}))).unwrap();

    assert_eq!(outcome.changed, flat(json!({"a": "1"})));
}

// ============================================================================
// Grafting
// ============================================================================

#[test]
fn test_partial_prefix_merges_with_siblings() {
    let mut tree = tree_of(json!({"k1/k2a": 1}));
    let k1 = tree.resolve(&PathKey::parse("k1")).unwrap().unwrap();
    let k2a = tree.resolve(&PathKey::parse("k1/k2a")).unwrap().unwrap();

    let outcome = change_values(&mut tree, &flat(json!({"k1/k2b": 2}))).unwrap();

    assert_eq!(outcome.changed, flat(json!({"k1/k2b": 2})));
    assert_eq!(tree.to_value().unwrap(), json!({"k1": {"k2a": 1, "k2b": 2}}));
    assert_eq!(tree.resolve(&PathKey::parse("k1")).unwrap(), Some(k1));
    assert_eq!(tree.resolve(&PathKey::parse("k1/k2a")).unwrap(), Some(k2a));
}

#[test]
fn test_existing_container_update() {
    let mut tree = tree_of(json!({"data1": 1, "subdata/sub1": "val1", "subdata/sub2": true}));

    let outcome = change_values(
        &mut tree,
        &flat(json!({
            "dir/data1": "value",
            "dir/data2": true,
            "data2": 2,
            "subdata/sub2": "val2",
        })),
    )
    .unwrap();

    assert_eq!(outcome.changed.len(), 4);
    assert_eq!(
        tree.to_value().unwrap(),
        json!({
            "data1": 1,
            "data2": 2,
            "dir": {"data1": "value", "data2": true},
            "subdata": {"sub1": "val1", "sub2": "val2"},
        })
    );
}

#[test]
fn test_untouched_branch_keeps_its_nodes() {
    let mut tree = tree_of(json!({"left/x": 1, "left/y": 2, "right/z": 3}));
    let left = tree.resolve(&PathKey::parse("left")).unwrap().unwrap();
    let before = tree.node(left).unwrap().clone();

    change_values(&mut tree, &flat(json!({"right/z": 4, "right/w": 5}))).unwrap();

    assert_eq!(tree.resolve(&PathKey::parse("left")).unwrap(), Some(left));
    assert_eq!(tree.node(left).unwrap(), &before);
}

#[test]
fn test_leaf_is_updated_in_place() {
    let mut tree = tree_of(json!({"a/b": 1}));
    let b = tree.resolve(&PathKey::parse("a/b")).unwrap().unwrap();
    let nodes = tree.len();

    change_values(&mut tree, &flat(json!({"a/b": 7}))).unwrap();

    assert_eq!(tree.resolve(&PathKey::parse("a/b")).unwrap(), Some(b));
    assert_eq!(tree.len(), nodes);
}

// ============================================================================
// Sub-tree Overwrites
// ============================================================================

#[test]
fn test_subtree_replaced_by_scalar() {
    let mut tree = tree_of(json!({"dir/a": 1, "dir/b": 2}));
    assert_eq!(tree.len(), 4);

    let outcome = change_values(&mut tree, &flat(json!({"dir": "gone"}))).unwrap();

    assert_eq!(outcome.changed, flat(json!({"dir": "gone"})));
    assert_eq!(tree.to_value().unwrap(), json!({"dir": "gone"}));
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_subtree_equal_to_value_is_unchanged() {
    let mut tree = tree_of(json!({"dir/a": 1, "dir/b": 2}));

    let outcome = change_values(&mut tree, &flat(json!({"dir": {"a": 1, "b": 2}}))).unwrap();

    assert!(outcome.changed.is_empty());
}

#[test]
fn test_leaf_in_the_way_is_overwritten() {
    let mut tree = tree_of(json!({"a": 1}));

    let outcome = change_values(&mut tree, &flat(json!({"a/b/c": 2}))).unwrap();

    assert_eq!(outcome.collisions, vec!["a".to_string()]);
    assert_eq!(outcome.changed, flat(json!({"a/b/c": 2})));
    assert_eq!(tree.to_value().unwrap(), json!({"a": {"b": {"c": 2}}}));
}

#[test]
fn test_collision_does_not_abort_batch() {
    let mut tree = tree_of(json!({"a": 1, "z": 0}));

    let outcome = change_values(
        &mut tree,
        &flat(json!({"0": "first", "a/b": 2, "z": 9})),
    )
    .unwrap();

    assert_eq!(outcome.changed.len(), 3);
    assert_eq!(
        tree.to_value().unwrap(),
        json!({"0": "first", "a": {"b": 2}, "z": 9})
    );
}

// ============================================================================
// Order Independence
// ============================================================================

#[test]
fn test_entry_order_does_not_change_tree() {
    let entries = [
        ("a/b", json!(1)),
        ("a/c", json!(2)),
        ("d/e/f", json!(true)),
        ("g", json!("x")),
    ];

    let mut forward = StateTree::new();
    for (path, value) in entries.iter() {
        let single = FlatState::from([(path.to_string(), value.clone())]);
        change_values(&mut forward, &single).unwrap();
    }

    let mut backward = StateTree::new();
    for (path, value) in entries.iter().rev() {
        let single = FlatState::from([(path.to_string(), value.clone())]);
        change_values(&mut backward, &single).unwrap();
    }

    assert_eq!(forward, backward);
    assert_eq!(
        forward.to_value().unwrap(),
        json!({"a": {"b": 1, "c": 2}, "d": {"e": {"f": true}}, "g": "x"})
    );
}

// ============================================================================
// Partial Failure
// ============================================================================

#[test]
fn test_failure_keeps_earlier_entries_applied() {
    let mut tree = tree_of(json!({"a": 1, "m/x": 1}));
    let x = tree.resolve(&PathKey::parse("m/x")).unwrap().unwrap();
    tree.drop_slot(x);

    let result = change_values(&mut tree, &flat(json!({"a": 2, "m/x": 5, "z": 3})));

    assert!(matches!(result, Err(StateError::InternalInconsistency(_))));
    let a = tree.resolve(&PathKey::parse("a")).unwrap().unwrap();
    assert_eq!(tree.node(a).unwrap(), &StateNode::Leaf(json!(2)));
    assert_eq!(tree.resolve(&PathKey::parse("z")).unwrap(), None);
}

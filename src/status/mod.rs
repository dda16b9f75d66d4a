//! Hierarchical path-keyed state engine.
//!
//! Status updates arrive as flat `path -> value` mappings such as
//! `{"dir/sub/key": 1}`. The engine materializes them into one nested
//! tree per named container, reports the minimal set of changed paths on
//! every update and answers selective sub-path queries.
//!
//! | Module | Role |
//! |--------|------|
//! | [`path`] | `/`-delimited path keys |
//! | [`tree`] | arena-backed container trees |
//! | [`builder`] | flat mapping to fresh tree |
//! | [`diff`] | in-place merge with change detection |
//! | [`projector`] | sub-path projection |
//! | [`store`] | container registry and update dispatch |

pub mod builder;
pub mod diff;
mod error;
pub mod path;
pub mod projector;
pub mod store;
pub mod tree;

use serde_json::Value;
use std::collections::BTreeMap;

/// Flat `path -> value` mapping as carried by a status update.
pub type FlatState = BTreeMap<String, Value>;

/// Flat set of paths whose value was added or altered by one update.
pub type ChangeSet = FlatState;

pub use builder::{nest, parse};
pub use diff::{DiffOutcome, change_values};
pub use error::StateError;
pub use path::PathKey;
pub use projector::retrieve_paths;
pub use store::{ApplyOutcome, StateStore, StatusEvent, UpdateKind};
pub use tree::{NodeId, StateNode, StateTree, Walk};

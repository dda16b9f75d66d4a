//! Request and response types for the status API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;


/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Kind of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// Plain state update.
    #[default]
    Info,
    /// State update that also records a warning.
    Warning,
}

/// A status update pushed to a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Update kind.
    #[serde(rename = "type")]
    pub kind: UpdateType,
    /// Target container.
    pub container: String,
    /// Flat map of `/`-delimited paths to values.
    pub data: BTreeMap<String, Value>,
    /// Warning origin.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub origin: String,
    /// Warning message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Warning reference payload.
    #[serde(rename = "ref", default, skip_serializing_if = "Value::is_null")]
    pub reference: Value,
}

impl StatusUpdate {
    /// Creates an empty `info` update for `container`.
    #[must_use]
    pub fn info(container: &str) -> Self {
        Self {
            kind: UpdateType::Info,
            container: container.to_string(),
            data: BTreeMap::new(),
            origin: String::new(),
            message: String::new(),
            reference: Value::Null,
        }
    }

    /// Creates an empty `warning` update for `container`.
    #[must_use]
    pub fn warning(container: &str, origin: &str, message: &str, reference: Value) -> Self {
        Self {
            kind: UpdateType::Warning,
            origin: origin.to_string(),
            message: message.to_string(),
            reference,
            ..Self::info(container)
        }
    }

    /// Adds a value at `path`.
    #[must_use]
    pub fn value(mut self, path: &str, value: Value) -> Self {
        self.data.insert(path.to_string(), value);
        self
    }
}

/// Response to a status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    /// Target container.
    pub container: String,
    /// Whether the update created the container.
    pub created: bool,
    /// Paths whose value was added or altered.
    pub changed: BTreeMap<String, Value>,
    /// Prefixes where a leaf value was replaced by a sub-tree.
    #[serde(default)]
    pub collisions: Vec<String>,
    /// Warning recorded by a `warning` update.
    #[serde(default)]
    pub warning: Option<Warning>,
}

/// Response to clearing all containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearStatusResponse {
    /// Number of containers dropped.
    pub cleared: usize,
}

/// Query for reading status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusQuery {
    /// Container to read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Bracketed path list, e.g. `[data1,subdata/sub2]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
}

impl StatusQuery {
    /// Query for a whole container.
    #[must_use]
    pub fn container(container: &str) -> Self {
        Self {
            container: Some(container.to_string()),
            values: None,
        }
    }

    /// Query for selected paths of a container.
    #[must_use]
    pub fn paths(container: &str, paths: &[&str]) -> Self {
        Self {
            container: Some(container.to_string()),
            values: Some(format!("[{}]", paths.join(","))),
        }
    }
}

/// A warning to record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWarning {
    /// Component that raised the warning.
    pub origin: String,
    /// Human-readable message.
    pub message: String,
    /// Structured reference payload.
    #[serde(rename = "ref", default)]
    pub reference: Value,
}

/// A recorded warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning identifier.
    pub id: u64,
    /// RFC 3339 timestamp.
    pub time: String,
    /// Component that raised the warning.
    pub origin: String,
    /// Human-readable message.
    pub message: String,
    /// Structured reference payload.
    #[serde(rename = "ref", default)]
    pub reference: Value,
}

/// Filter for listing warnings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WarningQuery {
    /// Exact origin to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Substring the message must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

//! Request and response models for the REST API.

use crate::status::{ApplyOutcome, PathKey, UpdateKind};
use crate::warning::{NewWarning, Warning};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// Kind of a status update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// Plain state update (default).
    #[default]
    Info,
    /// State update that also records a warning.
    Warning,
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Request to push status values into a container.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// Update kind.
    #[serde(rename = "type", default)]
    pub kind: UpdateType,
    /// Target container.
    pub container: String,
    /// Flat map of `/`-delimited paths to values.
    #[schema(value_type = Object)]
    pub data: BTreeMap<String, Value>,
    /// Warning origin, used when `type` is `warning`.
    #[serde(default)]
    pub origin: String,
    /// Warning message, used when `type` is `warning`.
    #[serde(default)]
    pub message: String,
    /// Warning reference payload, used when `type` is `warning`.
    #[serde(rename = "ref", default)]
    #[schema(value_type = Object)]
    pub reference: Value,
}

impl StatusUpdateRequest {
    /// Splits the request into the engine update kind, leaving `data` in place.
    #[must_use]
    pub fn update_kind(&self) -> UpdateKind {
        match self.kind {
            UpdateType::Info => UpdateKind::Info,
            UpdateType::Warning => UpdateKind::Warning(NewWarning {
                origin: self.origin.clone(),
                message: self.message.clone(),
                reference: self.reference.clone(),
            }),
        }
    }
}

/// Response to a status update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateResponse {
    /// Target container.
    pub container: String,
    /// Whether the update created the container.
    pub created: bool,
    /// Paths whose value was added or altered.
    #[schema(value_type = Object)]
    pub changed: BTreeMap<String, Value>,
    /// Prefixes where a leaf value was replaced by a sub-tree.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<String>,
    /// Warning recorded by a `warning` update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Warning>,
}

impl StatusUpdateResponse {
    /// Builds the response for `container` from an engine outcome.
    #[must_use]
    pub fn from_outcome(container: String, outcome: ApplyOutcome) -> Self {
        Self {
            container,
            created: outcome.created,
            changed: outcome.changed,
            collisions: outcome.collisions,
            warning: outcome.warning,
        }
    }
}

/// Response to clearing all containers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearStatusResponse {
    /// Number of containers dropped.
    pub cleared: usize,
}

/// Query parameters for reading status.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Container to read. All containers when omitted.
    pub container: Option<String>,
    /// Paths to project, e.g. `[data1,subdata/sub2]`.
    pub values: Option<String>,
}

impl StatusQuery {
    /// Parses the `values` list into paths.
    ///
    /// Accepts the bracketed form `[a,b/c]` as well as a bare comma list.
    /// Blank entries are ignored. Returns `None` when no `values` was given.
    #[must_use]
    pub fn paths(&self) -> Option<Vec<PathKey>> {
        let raw = self.values.as_deref()?.trim();
        let inner = raw
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(raw);

        Some(
            inner
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(PathKey::parse)
                .collect(),
        )
    }
}

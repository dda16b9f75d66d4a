//! Database rows and queries for persisted warnings.

use crate::warning::Warning;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;

use super::DatabasePool;

/// Warning record as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct WarningRow {
    /// Warning identifier.
    pub id: i64,
    /// Time the warning was recorded.
    pub time: DateTime<Utc>,
    /// Component that raised the warning.
    pub origin: String,
    /// Human-readable message.
    pub message: String,
    /// Structured reference payload.
    #[sqlx(rename = "ref")]
    pub reference: Json<Value>,
}

impl From<WarningRow> for Warning {
    fn from(row: WarningRow) -> Self {
        Warning {
            id: u64::try_from(row.id).unwrap_or_default(),
            time: row.time,
            origin: row.origin,
            message: row.message,
            reference: row.reference.0,
        }
    }
}

impl DatabasePool {
    /// Persists a recorded warning.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_warning(&self, warning: &Warning) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO status_warnings (id, time, origin, message, ref) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        )
        .bind(i64::try_from(warning.id).unwrap_or(i64::MAX))
        .bind(warning.time)
        .bind(&warning.origin)
        .bind(&warning.message)
        .bind(Json(&warning.reference))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Loads every persisted warning, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn load_warnings(&self) -> Result<Vec<Warning>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WarningRow>(
            "SELECT id, time, origin, message, ref FROM status_warnings ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Warning::from).collect())
    }
}

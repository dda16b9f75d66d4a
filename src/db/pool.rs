//! Database connection pool management.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// Table creation statement for persisted warnings.
const CREATE_WARNINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS status_warnings (
    id BIGINT PRIMARY KEY,
    time TIMESTAMPTZ NOT NULL,
    origin TEXT NOT NULL,
    message TEXT NOT NULL,
    ref JSONB NOT NULL
)
"#;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Creates a new database pool from the connection string.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        info!("Database connection pool established");

        Ok(Self { pool })
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the warning table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_WARNINGS_TABLE)
            .execute(&self.pool)
            .await?;
        info!("Database schema ready");
        Ok(())
    }
}

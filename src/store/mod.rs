//! Durable state: the counter singleton and the append-only message log.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, instrument};

/// Greeting seeded into an empty message log.
pub const DEFAULT_GREETING: &str = "Hello from tallyboard!";

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or a statement failed.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// The message log has no entries. Cannot happen after `initialize`.
    #[error("message log is empty")]
    EmptyLog,
}

/// Repository owning the on-disk representation of both records.
#[derive(Debug, Clone)]
pub struct StateStore {
    pool: SqlitePool,
}

impl StateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Seed the counter singleton and the default greeting.
    ///
    /// Idempotent: safe to run on every process start regardless of prior
    /// state. Table creation itself is handled by migrations at pool open.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> StoreResult<()> {
        sqlx::query("INSERT OR IGNORE INTO counter (id, value) VALUES (1, 0)")
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(
            "INSERT INTO messages (content) SELECT ? WHERE NOT EXISTS (SELECT 1 FROM messages)",
        )
        .bind(DEFAULT_GREETING)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!("seeded default greeting");
        }

        Ok(())
    }

    /// Current counter value.
    #[instrument(skip(self))]
    pub async fn counter_value(&self) -> StoreResult<i64> {
        let value: i64 = sqlx::query_scalar("SELECT value FROM counter WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }

    /// Overwrite the counter unconditionally.
    #[instrument(skip(self))]
    pub async fn set_counter(&self, value: i64) -> StoreResult<()> {
        sqlx::query("UPDATE counter SET value = ? WHERE id = 1")
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Add `delta` to the counter and return the resulting value.
    ///
    /// The read-modify-write happens in a single UPDATE so concurrent
    /// callers cannot lose updates.
    #[instrument(skip(self))]
    pub async fn add_to_counter(&self, delta: i64) -> StoreResult<i64> {
        let value: i64 = sqlx::query_scalar(
            "UPDATE counter SET value = value + ? WHERE id = 1 RETURNING value",
        )
        .bind(delta)
        .fetch_one(&self.pool)
        .await?;
        Ok(value)
    }

    /// Append a message entry and return its assigned id.
    #[instrument(skip(self, content))]
    pub async fn append_message(&self, content: &str) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar("INSERT INTO messages (content) VALUES (?) RETURNING id")
            .bind(content)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    /// Content of the highest-id entry.
    #[instrument(skip(self))]
    pub async fn latest_message(&self) -> StoreResult<String> {
        let content: Option<String> =
            sqlx::query_scalar("SELECT content FROM messages ORDER BY id DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;
        content.ok_or(StoreError::EmptyLog)
    }
}

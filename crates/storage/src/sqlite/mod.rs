use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::Evaluation;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::executor::{Executor, ExecutorError};

mod mapping;

pub use mapping::COLUMN_SEPARATOR;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Executor backed by a single `SQLite` connection.
///
/// Every statement, including the reference solutions run during the attach
/// pass, goes through the same connection so they all see one database.
#[derive(Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// enforcing foreign key constraints fails during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        tracing::debug!(database_url, "connected to sqlite");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Executor for SqliteExecutor {
    async fn evaluate(&self, sql: &str) -> Result<Evaluation, ExecutorError> {
        let query = sql.trim();
        let rows = sqlx::raw_sql(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) => ExecutorError::Sql(db.message().to_string()),
                other @ (sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Io(_)) => ExecutorError::Connection(other.to_string()),
                other => ExecutorError::Sql(other.to_string()),
            })?;

        let mut output = Vec::with_capacity(rows.len());
        for row in &rows {
            output.push(mapping::render_row(row)?);
        }
        Ok(Evaluation::new(output, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteExecutor>();
    }
}

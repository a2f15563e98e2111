use async_trait::async_trait;
use quiz_core::model::Evaluation;
use thiserror::Error;

/// Failures raised while running a statement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecutorError {
    #[error("{0}")]
    Sql(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Runs SQL text against a live database.
///
/// Implementations return the result rows in a canonical string form so that
/// two runs of equivalent statements compare equal.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute `sql` and return its rows plus the statement as run.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError` when the statement fails or the connection is gone.
    async fn evaluate(&self, sql: &str) -> Result<Evaluation, ExecutorError>;
}

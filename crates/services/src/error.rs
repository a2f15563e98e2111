//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use storage::executor::ExecutorError;
use storage::repository::StorageError;

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz has not been started")]
    NotStarted,
    #[error("expected output for question {index} has not been computed yet")]
    NotAttached { index: usize },
    #[error("solutions are not available for a closed quiz")]
    SolutionUnavailable,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Errors emitted while exporting a closed copy of a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("question {index} has no expected output yet; run a statement first")]
    MissingExpected { index: usize },
    #[error(transparent)]
    Quiz(QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<QuizError> for ExportError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::MissingExpected { index } => Self::MissingExpected { index },
            other => Self::Quiz(other),
        }
    }
}

/// Errors emitted by `QuizShell`.
///
/// Executor failures are kept separate so the host can report them the same
/// way it reports its own statement errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShellError {
    #[error(transparent)]
    Session(SessionError),
    #[error(transparent)]
    Executor(ExecutorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SessionError> for ShellError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Executor(inner) => Self::Executor(inner),
            other => Self::Session(other),
        }
    }
}

impl From<ExecutorError> for ShellError {
    fn from(err: ExecutorError) -> Self {
        Self::Executor(err)
    }
}

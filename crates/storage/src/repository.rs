use async_trait::async_trait;
use quiz_core::QuizError;
use quiz_core::model::QuizDocument;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::file::{FileQuizRepository, FileSuccessLog};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed quiz document: {0}")]
    Parse(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Invalid(#[from] QuizError),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Failure to produce a document from its source. Loading is all-or-nothing.
pub type LoadError = StorageError;

/// Repository contract for quiz documents.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Read and validate the document stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the source is unreadable, malformed or violates
    /// the open/closed invariants. No partial document is ever returned.
    async fn load(&self, path: &Path) -> Result<QuizDocument, LoadError>;

    /// Write `document` to `destination`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be serialized or written.
    async fn save(&self, document: &QuizDocument, destination: &Path) -> Result<(), StorageError>;
}

/// Append-only record of correct answers.
#[async_trait]
pub trait SuccessLog: Send + Sync {
    /// Append one block for a correct answer to the log at `log_path`,
    /// creating the log if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be opened or written.
    async fn record_success(
        &self,
        log_path: &Path,
        question_index: usize,
        statement: &str,
    ) -> Result<(), StorageError>;
}

/// Text block appended to the success log for one correct answer.
#[must_use]
pub fn success_block(question_index: usize, statement: &str) -> String {
    format!("\n\n*** {question_index}\n\n{statement}")
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    documents: Arc<Mutex<HashMap<PathBuf, QuizDocument>>>,
    logs: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
            logs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed a document at its own source path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert(&self, document: QuizDocument) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(document.source_path().to_path_buf(), document);
        Ok(())
    }

    /// Current contents of the log at `log_path`, if anything was appended.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn log_contents(&self, log_path: &Path) -> Result<Option<String>, StorageError> {
        let guard = self
            .logs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(log_path).cloned())
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn load(&self, path: &Path) -> Result<QuizDocument, LoadError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    async fn save(&self, document: &QuizDocument, destination: &Path) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(destination.to_path_buf(), document.clone());
        Ok(())
    }
}

#[async_trait]
impl SuccessLog for InMemoryRepository {
    async fn record_success(
        &self,
        log_path: &Path,
        question_index: usize,
        statement: &str,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .logs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry(log_path.to_path_buf())
            .or_default()
            .push_str(&success_block(question_index, statement));
        Ok(())
    }
}

/// Aggregates the document repository and success log behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub success_log: Arc<dyn SuccessLog>,
}

impl Storage {
    /// File-backed storage: YAML/JSON documents and plain-text logs.
    #[must_use]
    pub fn files() -> Self {
        Self {
            quizzes: Arc::new(FileQuizRepository::new()),
            success_log: Arc::new(FileSuccessLog::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuizMode};

    fn build_quiz(path: &str) -> QuizDocument {
        QuizDocument::new(
            "Basics",
            "Warm up",
            QuizMode::Open,
            vec![Question::open("One", "Select one", "SELECT 1")],
            path,
        )
        .unwrap()
    }

    #[test]
    fn success_block_layout() {
        assert_eq!(success_block(0, "SELECT 1"), "\n\n*** 0\n\nSELECT 1");
    }

    #[tokio::test]
    async fn load_returns_seeded_document() {
        let repo = InMemoryRepository::new();
        repo.insert(build_quiz("/q/basics.yaml")).unwrap();

        let loaded = repo.load(Path::new("/q/basics.yaml")).await.unwrap();
        assert_eq!(loaded.title(), "Basics");
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.load(Path::new("/q/nope.yaml")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn log_appends_blocks_in_order() {
        let repo = InMemoryRepository::new();
        let log = Path::new("/q/basics.yaml.log");
        repo.record_success(log, 0, "SELECT 1").await.unwrap();
        repo.record_success(log, 1, "SELECT 2").await.unwrap();

        assert_eq!(
            repo.log_contents(log).unwrap().as_deref(),
            Some("\n\n*** 0\n\nSELECT 1\n\n*** 1\n\nSELECT 2")
        );
    }
}

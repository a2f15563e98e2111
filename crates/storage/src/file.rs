use std::path::Path;

use async_trait::async_trait;
use quiz_core::model::QuizDocument;
use tokio::io::AsyncWriteExt;

use crate::record::QuizRecord;
use crate::repository::{LoadError, QuizRepository, StorageError, SuccessLog, success_block};

/// On-disk encoding of a quiz document, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    fn parse(self, raw: &str) -> Result<QuizRecord, StorageError> {
        match self {
            Self::Yaml => serde_yaml::from_str(raw).map_err(|e| StorageError::Parse(e.to_string())),
            Self::Json => serde_json::from_str(raw).map_err(|e| StorageError::Parse(e.to_string())),
        }
    }

    fn render(self, record: &QuizRecord) -> Result<String, StorageError> {
        match self {
            Self::Yaml => {
                serde_yaml::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))
            }
            Self::Json => serde_json::to_string_pretty(record)
                .map_err(|e| StorageError::Serialization(e.to_string())),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Quiz documents stored as YAML or JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileQuizRepository;

impl FileQuizRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuizRepository for FileQuizRepository {
    async fn load(&self, path: &Path) -> Result<QuizDocument, LoadError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(io_err(path))?;
        let record = DocumentFormat::from_path(path).parse(&raw)?;
        let document = record.into_document(path)?;
        tracing::debug!(
            path = %path.display(),
            questions = document.len(),
            closed = document.is_closed(),
            "loaded quiz document"
        );
        Ok(document)
    }

    async fn save(&self, document: &QuizDocument, destination: &Path) -> Result<(), StorageError> {
        let record = QuizRecord::from_document(document);
        let rendered = DocumentFormat::from_path(destination).render(&record)?;
        tokio::fs::write(destination, rendered)
            .await
            .map_err(io_err(destination))?;
        tracing::debug!(path = %destination.display(), "wrote quiz document");
        Ok(())
    }
}

/// Plain-text success log, appended to and never rewritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSuccessLog;

impl FileSuccessLog {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SuccessLog for FileSuccessLog {
    async fn record_success(
        &self,
        log_path: &Path,
        question_index: usize,
        statement: &str,
    ) -> Result<(), StorageError> {
        // The handle is dropped at the end of this scope on every path.
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .await
            .map_err(io_err(log_path))?;
        file.write_all(success_block(question_index, statement).as_bytes())
            .await
            .map_err(io_err(log_path))?;
        file.flush().await.map_err(io_err(log_path))?;
        Ok(())
    }
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::QuizError;
use crate::model::output::ExpectedOutput;
use crate::model::question::Question;

/// Whether a quiz still carries its reference solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    /// Authoring copy, solutions present.
    Open,
    /// Distribution copy, solutions stripped and expected outputs stored.
    Closed,
}

impl QuizMode {
    #[must_use]
    pub fn from_closed_flag(closed: bool) -> Self {
        if closed { Self::Closed } else { Self::Open }
    }

    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A loaded quiz: metadata plus its ordered questions.
///
/// The question order is the progression order and never changes after
/// construction. Every question matches the document mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDocument {
    title: String,
    description: String,
    mode: QuizMode,
    questions: Vec<Question>,
    source_path: PathBuf,
}

impl QuizDocument {
    /// Build a document, checking the mode/question invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list,
    /// `QuizError::MissingSolution` when an open quiz holds a closed question and
    /// `QuizError::UnexpectedSolution` when a closed quiz holds an open one.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        mode: QuizMode,
        questions: Vec<Question>,
        source_path: impl Into<PathBuf>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        for (index, question) in questions.iter().enumerate() {
            match (mode, question.is_open()) {
                (QuizMode::Open, false) => return Err(QuizError::MissingSolution { index }),
                (QuizMode::Closed, true) => return Err(QuizError::UnexpectedSolution { index }),
                _ => {}
            }
        }

        Ok(Self {
            title: title.into(),
            description: description.into(),
            mode,
            questions,
            source_path: source_path.into(),
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.mode.is_closed()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Companion success log: the source path with `.log` appended.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        let mut raw = OsString::from(self.source_path.as_os_str());
        raw.push(".log");
        PathBuf::from(raw)
    }

    /// Index of the first question without an expected output.
    #[must_use]
    pub fn first_missing_expected(&self) -> Option<usize> {
        self.questions.iter().position(|q| !q.is_answerable())
    }

    /// Store derived expected outputs, one per question in document order.
    ///
    /// Closed questions keep their authored output.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::MissingExpected` naming the first question left
    /// without output when fewer outputs than questions are given. Nothing is
    /// stored in that case.
    pub fn attach_expected(&mut self, outputs: Vec<ExpectedOutput>) -> Result<(), QuizError> {
        if outputs.len() < self.questions.len() {
            return Err(QuizError::MissingExpected {
                index: outputs.len(),
            });
        }

        for (question, output) in self.questions.iter_mut().zip(outputs) {
            question.attach_expected(output);
        }
        Ok(())
    }

    /// Solution-free copy of this document in closed mode.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::MissingExpected` for the first question that has no
    /// expected output yet.
    pub fn closed_copy(&self) -> Result<Self, QuizError> {
        let mut questions = Vec::with_capacity(self.questions.len());
        for (index, question) in self.questions.iter().enumerate() {
            let closed = question
                .to_closed()
                .ok_or(QuizError::MissingExpected { index })?;
            questions.push(closed);
        }

        Ok(Self {
            title: self.title.clone(),
            description: self.description.clone(),
            mode: QuizMode::Closed,
            questions,
            source_path: self.source_path.clone(),
        })
    }

    /// Switch this document to closed mode, dropping every solution.
    ///
    /// # Errors
    ///
    /// Same as [`QuizDocument::closed_copy`]; the document is left untouched on error.
    pub fn close(&mut self) -> Result<(), QuizError> {
        *self = self.closed_copy()?;
        Ok(())
    }
}

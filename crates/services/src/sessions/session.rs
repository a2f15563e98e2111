use std::path::Path;

use quiz_core::model::{ExpectedOutput, Question, QuizDocument};
use storage::executor::Executor;
use storage::repository::QuizRepository;

use super::progress::{Progress, SessionProgress};
use super::view::{COMPLETION_MESSAGE, Welcome, full_prompt};
use crate::error::{ExportError, SessionError};

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Runtime state of one learner working through one quiz.
///
/// Owns the document exclusively. The cursor only moves through `start` and
/// `advance`; the expected-output latch only flips once, from false to true.
#[derive(Debug)]
pub struct QuizSession {
    document: QuizDocument,
    progress: Progress,
    expected_attached: bool,
}

impl QuizSession {
    /// Wrap a loaded document. Closed documents ship their expected output, so
    /// they start with the latch already set.
    #[must_use]
    pub fn new(document: QuizDocument) -> Self {
        let expected_attached = document.is_closed();
        Self {
            document,
            progress: Progress::NotStarted,
            expected_attached,
        }
    }

    #[must_use]
    pub fn document(&self) -> &QuizDocument {
        &self.document
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.document.is_closed()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn expected_attached(&self) -> bool {
        self.expected_attached
    }

    /// Position summary, or `None` before `start`.
    #[must_use]
    pub fn summary(&self) -> Option<SessionProgress> {
        self.progress.index().map(|index| SessionProgress {
            position: index + 1,
            total: self.document.len(),
            is_finished: matches!(self.progress, Progress::Finished(_)),
        })
    }

    /// Put the cursor on the first question and return what to greet the learner with.
    pub fn start(&mut self) -> Welcome {
        self.progress = Progress::Active(0);
        Welcome {
            title: self.document.title().to_owned(),
            description: self.document.description().to_owned(),
            question_count: self.document.len(),
        }
    }

    /// Derive every question's expected output by running its solution, once.
    ///
    /// Solutions run sequentially in document order because they share one
    /// database connection and may depend on each other's side effects.
    /// Later calls return immediately without touching the executor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Executor` if a solution fails to run. Nothing is
    /// stored and the latch stays unset in that case.
    pub async fn ensure_expected_attached(
        &mut self,
        executor: &dyn Executor,
    ) -> Result<(), SessionError> {
        if self.expected_attached {
            return Ok(());
        }

        if !self.document.is_closed() {
            let solutions: Vec<String> = self
                .document
                .questions()
                .iter()
                .filter_map(|q| q.solution().map(str::to_owned))
                .collect();
            tracing::info!(questions = solutions.len(), "deriving expected output");

            let mut outputs = Vec::with_capacity(solutions.len());
            for solution in &solutions {
                let evaluation = executor.evaluate(solution).await?;
                outputs.push(ExpectedOutput::new(evaluation.output));
            }
            self.document.attach_expected(outputs)?;
        }

        self.expected_attached = true;
        Ok(())
    }

    /// Index of the question the learner is on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`.
    pub fn current_index(&self) -> Result<usize, SessionError> {
        self.progress.index().ok_or(SessionError::NotStarted)
    }

    /// The question the learner is on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        let index = self.current_index()?;
        self.document
            .question(index)
            .ok_or(SessionError::NotStarted)
    }

    fn current_expected(&self) -> Result<&ExpectedOutput, SessionError> {
        self.expected_at(self.current_index()?)
    }

    fn expected_at(&self, index: usize) -> Result<&ExpectedOutput, SessionError> {
        self.document
            .question(index)
            .ok_or(SessionError::NotStarted)?
            .expected()
            .ok_or(SessionError::NotAttached { index })
    }

    fn prompt_at(&self, index: usize) -> Result<String, SessionError> {
        let expected = self.expected_at(index)?;
        let question = self.document.question(index).ok_or(SessionError::NotStarted)?;
        Ok(full_prompt(question, expected))
    }

    /// Learner-facing text for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start` and
    /// `SessionError::NotAttached` while the expected output is unknown.
    pub fn render_prompt(&self) -> Result<String, SessionError> {
        self.prompt_at(self.current_index()?)
    }

    /// Whether `output` is exactly the current question's expected output.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::render_prompt`].
    pub fn verify(&self, output: &[String]) -> Result<bool, SessionError> {
        Ok(self.current_expected()?.matches(output))
    }

    /// Move to the next question and render it, or report completion when
    /// already on the last one. Completion leaves the cursor where it is.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`, and
    /// `SessionError::NotAttached` if the next question has no expected output.
    /// The cursor does not move on error.
    pub fn advance(&mut self) -> Result<String, SessionError> {
        let index = self.current_index()?;
        if index + 1 < self.document.len() {
            let prompt = self.prompt_at(index + 1)?;
            self.progress = Progress::Active(index + 1);
            Ok(prompt)
        } else {
            self.progress = Progress::Finished(index);
            Ok(COMPLETION_MESSAGE.to_owned())
        }
    }

    /// Reference solution of the current question, verbatim.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SolutionUnavailable` for closed quizzes and
    /// `SessionError::NotStarted` before `start`.
    pub fn reveal_solution(&self) -> Result<&str, SessionError> {
        if self.document.is_closed() {
            return Err(SessionError::SolutionUnavailable);
        }
        self.current_question()?
            .solution()
            .ok_or(SessionError::SolutionUnavailable)
    }

    /// Write a solution-free copy to `destination` and switch this quiz to
    /// closed mode.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::MissingExpected` if any question has no expected
    /// output yet, and `ExportError::Storage` if writing fails. The session is
    /// unchanged on error.
    pub async fn export_closed_copy(
        &mut self,
        quizzes: &dyn QuizRepository,
        destination: &Path,
    ) -> Result<(), ExportError> {
        let closed = self.document.closed_copy()?;
        quizzes.save(&closed, destination).await?;
        self.document = closed;
        self.expected_attached = true;
        tracing::info!(path = %destination.display(), "exported closed quiz");
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use std::path::Path;
use std::sync::Arc;

use quiz_core::model::Evaluation;
use storage::executor::Executor;
use storage::repository::{QuizRepository, Storage, SuccessLog};

use crate::commands::{
    CommandRegistry, Notifier, PlainHighlighter, QuizCommand, SolutionHighlighter,
    export_destination,
};
use crate::error::ShellError;
use crate::sessions::{QuizSession, SUCCESS_TEXT, SUCCESS_TITLE, SessionProgress, Welcome};

/// Wraps a host executor with quiz behaviour.
///
/// Every learner statement goes through [`QuizShell::evaluate`]: expected
/// outputs are derived before the first statement runs, and each result is
/// checked against the current question afterwards. Learner commands go
/// through [`QuizShell::run_command`].
pub struct QuizShell {
    session: QuizSession,
    executor: Arc<dyn Executor>,
    quizzes: Arc<dyn QuizRepository>,
    success_log: Arc<dyn SuccessLog>,
    notifier: Arc<dyn Notifier>,
    highlighter: Arc<dyn SolutionHighlighter>,
}

impl QuizShell {
    #[must_use]
    pub fn new(
        session: QuizSession,
        executor: Arc<dyn Executor>,
        storage: &Storage,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            executor,
            quizzes: Arc::clone(&storage.quizzes),
            success_log: Arc::clone(&storage.success_log),
            notifier,
            highlighter: Arc::new(PlainHighlighter),
        }
    }

    /// Load the quiz at `path` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Storage` if the document cannot be loaded.
    pub async fn open(
        path: &Path,
        executor: Arc<dyn Executor>,
        storage: &Storage,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ShellError> {
        let document = storage.quizzes.load(path).await?;
        tracing::info!(
            path = %path.display(),
            questions = document.len(),
            closed = document.is_closed(),
            "quiz loaded"
        );
        Ok(Self::new(
            QuizSession::new(document),
            executor,
            storage,
            notifier,
        ))
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Arc<dyn SolutionHighlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.summary()
    }

    /// Start the quiz and greet the learner through the notifier.
    pub fn start(&mut self) -> Welcome {
        let welcome = self.session.start();
        self.notifier.notify(&welcome.title, &welcome.description);
        welcome
    }

    /// Commands currently on offer. `\solution` is withheld for closed quizzes.
    #[must_use]
    pub fn commands(&self) -> Vec<QuizCommand> {
        QuizCommand::ALL
            .into_iter()
            .filter(|cmd| *cmd != QuizCommand::Solution || !self.session.is_closed())
            .collect()
    }

    /// Offered command with this name, if any.
    #[must_use]
    pub fn resolve_command(&self, name: &str) -> Option<QuizCommand> {
        QuizCommand::from_name(name).filter(|cmd| self.commands().contains(cmd))
    }

    pub fn register_commands(&self, registry: &mut dyn CommandRegistry) {
        for cmd in self.commands() {
            registry.register(cmd.spec());
        }
    }

    /// Run a learner statement through the host executor and check the result.
    ///
    /// On a correct answer the learner is notified and the statement is
    /// appended to the quiz's success log.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Executor` when the statement (or, on the first
    /// call, a reference solution) fails, and `ShellError::Session` if the quiz
    /// was never started.
    pub async fn evaluate(&mut self, text: &str) -> Result<Evaluation, ShellError> {
        self.session
            .ensure_expected_attached(self.executor.as_ref())
            .await?;

        let evaluation = self.executor.evaluate(text).await?;

        if self.session.verify(&evaluation.output)? {
            self.record_success(text).await?;
        }
        Ok(evaluation)
    }

    async fn record_success(&self, text: &str) -> Result<(), ShellError> {
        let index = self.session.current_index()?;
        tracing::info!(question = index, "correct answer");
        self.notifier.notify(SUCCESS_TITLE, SUCCESS_TEXT);

        let log_path = self.session.document().log_path();
        if let Err(err) = self
            .success_log
            .record_success(&log_path, index, text)
            .await
        {
            tracing::warn!(path = %log_path.display(), error = %err, "could not append to success log");
        }
        Ok(())
    }

    /// Run a learner command and return the text to display.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Executor` if deriving expected outputs fails, and
    /// `ShellError::Session` for session contract violations. Export problems
    /// are reported in the returned text instead.
    pub async fn run_command(&mut self, cmd: QuizCommand, args: &str) -> Result<String, ShellError> {
        self.session
            .ensure_expected_attached(self.executor.as_ref())
            .await?;

        match cmd {
            QuizCommand::Question => Ok(self.session.render_prompt()?),
            QuizCommand::Next => Ok(self.session.advance()?),
            QuizCommand::Solution => {
                let solution = self.session.reveal_solution()?;
                Ok(self.highlighter.highlight(solution))
            }
            QuizCommand::ExportClosedQuiz => Ok(self.export(args).await),
        }
    }

    async fn export(&mut self, args: &str) -> String {
        let Some(destination) = export_destination(args) else {
            return format!("Usage: {}", QuizCommand::ExportClosedQuiz.syntax());
        };

        match self
            .session
            .export_closed_copy(self.quizzes.as_ref(), Path::new(destination))
            .await
        {
            Ok(()) => format!("Export successful: {destination}"),
            Err(err) => {
                tracing::warn!(destination, error = %err, "export failed");
                format!("Export failed: {err}")
            }
        }
    }
}

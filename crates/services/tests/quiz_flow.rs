use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{Evaluation, Question, QuizDocument, QuizMode};
use services::{
    COMPLETION_MESSAGE, CommandRegistry, CommandSpec, Notifier, QuizCommand, QuizSession,
    QuizShell,
};
use storage::executor::{Executor, ExecutorError};
use storage::repository::{InMemoryRepository, QuizRepository, Storage};
use storage::sqlite::SqliteExecutor;

/// Maps `SELECT n` to `["n"]`, recording every statement it sees.
#[derive(Default)]
struct ScriptedExecutor {
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn evaluate(&self, sql: &str) -> Result<Evaluation, ExecutorError> {
        self.calls.lock().unwrap().push(sql.to_string());
        let value = sql
            .strip_prefix("SELECT ")
            .ok_or_else(|| ExecutorError::Sql(format!("syntax error near {sql}")))?;
        Ok(Evaluation::new(vec![value.to_string()], sql))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn titles(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, text: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), text.to_string()));
    }
}

#[derive(Default)]
struct ListRegistry(Vec<CommandSpec>);

impl CommandRegistry for ListRegistry {
    fn register(&mut self, spec: CommandSpec) {
        self.0.push(spec);
    }
}

const SOURCE: &str = "/quizzes/numbers.yaml";
const LOG: &str = "/quizzes/numbers.yaml.log";

fn numbers_quiz() -> QuizDocument {
    QuizDocument::new(
        "Numbers",
        "Return the right number.",
        QuizMode::Open,
        vec![
            Question::open("One", "Return one.", "SELECT 1"),
            Question::open("Two", "Return two.", "SELECT 2"),
        ],
        SOURCE,
    )
    .unwrap()
}

struct Harness {
    shell: QuizShell,
    repo: InMemoryRepository,
    executor: Arc<ScriptedExecutor>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(document: QuizDocument) -> Harness {
    let repo = InMemoryRepository::new();
    let storage = Storage {
        quizzes: Arc::new(repo.clone()),
        success_log: Arc::new(repo.clone()),
    };
    let executor = Arc::new(ScriptedExecutor::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let shell = QuizShell::new(
        QuizSession::new(document),
        executor.clone(),
        &storage,
        notifier.clone(),
    );
    Harness {
        shell,
        repo,
        executor,
        notifier,
    }
}

#[tokio::test]
async fn two_question_walkthrough() {
    let mut h = harness(numbers_quiz());

    let welcome = h.shell.start();
    assert_eq!(welcome.title, "Numbers");
    assert_eq!(welcome.question_count, 2);

    // First submission derives both expected outputs before running itself.
    let eval = h.shell.evaluate("SELECT 1").await.unwrap();
    assert_eq!(eval.output, vec!["1".to_string()]);
    assert_eq!(h.executor.calls(), vec!["SELECT 1", "SELECT 2", "SELECT 1"]);
    assert_eq!(h.notifier.titles(), vec!["Numbers", "Success!"]);
    assert_eq!(
        h.repo.log_contents(Path::new(LOG)).unwrap().as_deref(),
        Some("\n\n*** 0\n\nSELECT 1")
    );

    let prompt = h.shell.run_command(QuizCommand::Next, "").await.unwrap();
    assert!(prompt.contains("Two"));
    assert!(prompt.contains("    2"));

    h.shell.evaluate("SELECT 3").await.unwrap();
    assert_eq!(h.notifier.titles(), vec!["Numbers", "Success!"]);
    assert_eq!(
        h.repo.log_contents(Path::new(LOG)).unwrap().as_deref(),
        Some("\n\n*** 0\n\nSELECT 1")
    );

    // Attach ran exactly once across the session.
    assert_eq!(h.executor.calls().len(), 4);

    let done = h.shell.run_command(QuizCommand::Next, "").await.unwrap();
    assert_eq!(done, COMPLETION_MESSAGE);
    let again = h.shell.run_command(QuizCommand::Next, "").await.unwrap();
    assert_eq!(again, COMPLETION_MESSAGE);
    assert_eq!(h.shell.session().current_index().unwrap(), 1);
}

#[tokio::test]
async fn first_command_also_triggers_attach() {
    let mut h = harness(numbers_quiz());
    h.shell.start();

    let prompt = h
        .shell
        .run_command(QuizCommand::Question, "")
        .await
        .unwrap();
    assert!(prompt.contains("    1"));
    assert_eq!(h.executor.calls(), vec!["SELECT 1", "SELECT 2"]);
}

#[tokio::test]
async fn executor_errors_propagate_untouched() {
    let mut h = harness(numbers_quiz());
    h.shell.start();
    h.shell.evaluate("SELECT 1").await.unwrap();

    let err = h.shell.evaluate("SELEC 1").await.unwrap_err();
    assert!(matches!(err, services::ShellError::Executor(_)));
}

#[tokio::test]
async fn solution_command_is_withheld_for_closed_quizzes() {
    let mut h = harness(numbers_quiz());
    h.shell.start();

    let mut open_registry = ListRegistry::default();
    h.shell.register_commands(&mut open_registry);
    assert!(open_registry.0.iter().any(|spec| spec.name == "\\solution"));

    let solution = h
        .shell
        .run_command(QuizCommand::Solution, "")
        .await
        .unwrap();
    assert_eq!(solution, "SELECT 1");

    let message = h
        .shell
        .run_command(QuizCommand::ExportClosedQuiz, "/quizzes/closed.yaml trailing")
        .await
        .unwrap();
    assert_eq!(message, "Export successful: /quizzes/closed.yaml");
    assert!(h.shell.session().is_closed());
    assert_eq!(h.shell.resolve_command("\\solution"), None);

    let mut closed_registry = ListRegistry::default();
    h.shell.register_commands(&mut closed_registry);
    assert_eq!(closed_registry.0.len(), 3);
    assert!(closed_registry.0.iter().all(|spec| spec.name != "\\solution"));

    let exported = h.repo.load(Path::new("/quizzes/closed.yaml")).await.unwrap();
    assert!(exported.is_closed());
}

#[tokio::test]
async fn export_without_path_shows_usage() {
    let mut h = harness(numbers_quiz());
    h.shell.start();

    let message = h
        .shell
        .run_command(QuizCommand::ExportClosedQuiz, "  ")
        .await
        .unwrap();
    assert_eq!(message, "Usage: \\export_closed_quiz <path>");
    assert!(!h.shell.session().is_closed());
}

#[tokio::test]
async fn failed_export_reports_and_keeps_quiz_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = QuizShell::new(
        QuizSession::new(numbers_quiz()),
        Arc::new(ScriptedExecutor::default()),
        &Storage::files(),
        Arc::new(RecordingNotifier::default()),
    );
    shell.start();

    let destination = dir.path().join("missing").join("closed.yaml");
    let message = shell
        .run_command(
            QuizCommand::ExportClosedQuiz,
            destination.to_str().unwrap(),
        )
        .await
        .unwrap();

    assert!(message.starts_with("Export failed: "), "{message}");
    assert!(!destination.exists());
    assert!(!shell.session().is_closed());
    assert_eq!(shell.resolve_command("\\solution"), Some(QuizCommand::Solution));
}

#[tokio::test]
async fn file_backed_quiz_against_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let quiz_path = dir.path().join("users.yaml");
    std::fs::write(
        &quiz_path,
        r"
title: Users
description: Query the users table.
closed: false
questions:
  - title: Names
    prompt: List user names alphabetically.
    solution: SELECT name FROM users ORDER BY name;
  - title: Count
    prompt: How many users are there?
    solution: SELECT count(*) FROM users;
",
    )
    .unwrap();

    let executor = Arc::new(SqliteExecutor::connect("sqlite::memory:").await.unwrap());
    executor
        .evaluate(
            "CREATE TABLE users (name TEXT);
             INSERT INTO users VALUES ('Linus'), ('Ada'), ('Grace');",
        )
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let mut shell = QuizShell::open(&quiz_path, executor, &Storage::files(), notifier.clone())
        .await
        .unwrap();
    shell.start();

    // Unordered answer has the right rows in the wrong order.
    shell.evaluate("SELECT name FROM users;").await.unwrap();
    assert!(!dir.path().join("users.yaml.log").exists());

    let statement = "SELECT name FROM users ORDER BY 1;";
    shell.evaluate(statement).await.unwrap();
    let log = std::fs::read_to_string(dir.path().join("users.yaml.log")).unwrap();
    assert_eq!(log, format!("\n\n*** 0\n\n{statement}"));

    let prompt = shell.run_command(QuizCommand::Next, "").await.unwrap();
    assert!(prompt.contains("    3"));
    assert_eq!(notifier.titles(), vec!["Users", "Success!"]);
}

use std::borrow::Cow;
use std::sync::Arc;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Editor, Helper};
use services::commands::split_command;
use services::{CommandRegistry, CommandSpec, Notifier, QuizShell, ShellError};
use storage::executor::Executor;
use storage::sqlite::SqliteExecutor;

use crate::config::HostConfig;
use crate::highlight::{PROMPT_COLOR, RESET_COLOR, SqlHighlighter};

const HOST_COMMANDS: &[(&str, &str)] = &[("\\?", "Show this help"), ("\\q", "Quit")];

/// A statement is complete once it ends with `;`. Commands are single-line.
fn is_complete(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.is_empty() || trimmed.starts_with('\\') || trimmed.ends_with(';')
}

struct SqlHelper {
    highlighter: Option<SqlHighlighter>,
}

impl Helper for SqlHelper {}

impl Completer for SqlHelper {
    type Candidate = String;
}

impl Hinter for SqlHelper {
    type Hint = String;
}

impl Validator for SqlHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if is_complete(ctx.input()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

impl Highlighter for SqlHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match &self.highlighter {
            Some(highlighter) => Cow::Owned(
                line.split('\n')
                    .map(|l| highlighter.highlight_line(l))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            None => Cow::Borrowed(line),
        }
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        if self.highlighter.is_some() {
            Cow::Owned(format!("{PROMPT_COLOR}{prompt}{RESET_COLOR}"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        self.highlighter.is_some()
    }
}

/// Prints notifications as a framed block on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, text: &str) {
        let width = title
            .chars()
            .count()
            .max(text.lines().map(|l| l.chars().count()).max().unwrap_or(0));
        let rule = "─".repeat(width + 2);
        println!("┌{rule}┐");
        println!("│ \x1b[1m{title:<width$}\x1b[0m │");
        println!("├{rule}┤");
        for line in text.lines() {
            println!("│ {line:<width$} │");
        }
        println!("└{rule}┘");
    }
}

#[derive(Debug)]
pub enum ReplError {
    Editor(ReadlineError),
}

impl std::fmt::Display for ReplError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplError::Editor(e) => write!(f, "failed to create REPL editor: {e}"),
        }
    }
}

impl std::error::Error for ReplError {}

/// Line-oriented SQL prompt over a single `SQLite` connection.
pub struct Repl {
    editor: Editor<SqlHelper, DefaultHistory>,
    config: HostConfig,
    executor: Arc<SqliteExecutor>,
    commands: Vec<CommandSpec>,
}

impl CommandRegistry for Repl {
    fn register(&mut self, spec: CommandSpec) {
        tracing::debug!(name = spec.name, "registered command");
        self.commands.push(spec);
    }
}

impl Repl {
    /// Build the editor and load history.
    ///
    /// # Errors
    ///
    /// Returns `ReplError::Editor` if the terminal editor cannot be created.
    pub fn new(config: HostConfig, executor: Arc<SqliteExecutor>) -> Result<Self, ReplError> {
        let editor_config = Config::builder().bracketed_paste(true).build();
        let mut editor: Editor<SqlHelper, DefaultHistory> =
            Editor::with_config(editor_config).map_err(ReplError::Editor)?;
        editor.set_helper(Some(SqlHelper {
            highlighter: config.highlight.then_some(SqlHighlighter),
        }));

        if let Some(path) = &config.history_file {
            // A missing history file is normal on first run.
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            config,
            executor,
            commands: Vec::new(),
        })
    }

    fn prompt(&self, shell: Option<&QuizShell>) -> String {
        match shell.and_then(QuizShell::progress) {
            Some(progress) => format!(
                "[{}/{}] {}",
                progress.position, progress.total, self.config.prompt
            ),
            None => self.config.prompt.clone(),
        }
    }

    fn print_help(&self, shell: Option<&QuizShell>) {
        for (name, help) in HOST_COMMANDS {
            println!("  {name:<32} {help}");
        }
        for spec in &self.commands {
            // Offered commands can shrink after an export closes the quiz.
            let offered = shell.is_none_or(|shell| shell.resolve_command(spec.name).is_some());
            if offered {
                println!("  {:<32} {}", spec.syntax, spec.help);
            }
        }
    }

    fn print_rows(rows: &[String]) {
        for row in rows {
            println!("{row}");
        }
        let noun = if rows.len() == 1 { "row" } else { "rows" };
        println!("({} {noun})", rows.len());
    }

    fn print_error(err: &dyn std::fmt::Display) {
        eprintln!("\x1b[31mERROR:\x1b[0m {err}");
    }

    async fn handle_command(&self, line: &str, shell: Option<&mut QuizShell>) -> bool {
        let Some((name, args)) = split_command(line) else {
            return true;
        };
        match name {
            "\\q" => return false,
            "\\?" => {
                self.print_help(shell.as_deref());
                return true;
            }
            _ => {}
        }

        let Some(shell) = shell else {
            Self::print_error(&format!("unknown command: {name}"));
            return true;
        };
        let Some(cmd) = shell.resolve_command(name) else {
            Self::print_error(&format!("unknown command: {name}"));
            return true;
        };
        match shell.run_command(cmd, args).await {
            Ok(text) => println!("{text}"),
            Err(err) => Self::print_error(&err),
        }
        true
    }

    async fn handle_statement(&self, sql: &str, shell: Option<&mut QuizShell>) {
        let result = match shell {
            Some(shell) => shell.evaluate(sql).await,
            None => self.executor.evaluate(sql).await.map_err(ShellError::from),
        };
        match result {
            Ok(evaluation) => Self::print_rows(&evaluation.output),
            Err(err) => Self::print_error(&err),
        }
    }

    /// Read and run input until `\q` or end of input.
    pub async fn run(&mut self, mut shell: Option<&mut QuizShell>) {
        loop {
            let prompt = self.prompt(shell.as_deref());
            let input = match self.editor.readline(&prompt) {
                Ok(input) => input,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    Self::print_error(&err);
                    break;
                }
            };

            let trimmed = input.trim();
            if trimmed.is_empty() {
                continue;
            }
            let _ = self.editor.add_history_entry(&input);

            if trimmed.starts_with('\\') {
                if !self.handle_command(trimmed, shell.as_deref_mut()).await {
                    break;
                }
            } else {
                self.handle_statement(trimmed, shell.as_deref_mut()).await;
            }
        }

        if let Some(path) = &self.config.history_file {
            if let Err(err) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), error = %err, "could not save history");
            }
        }
    }
}

#![forbid(unsafe_code)]

pub mod commands;
pub mod error;
pub mod sessions;
pub mod shell;

pub use commands::{CommandRegistry, CommandSpec, Notifier, QuizCommand, SolutionHighlighter};
pub use error::{ExportError, SessionError, ShellError};
pub use sessions::{COMPLETION_MESSAGE, Progress, QuizSession, SessionProgress, Welcome};
pub use shell::QuizShell;

use std::fmt;
use std::path::{Path, PathBuf};

pub const QUIZ_FLAG: &str = "--quiz";
pub const CONFIG_FLAG: &str = "--config";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Process arguments after the quiz flag has been pulled out.
#[derive(Debug, PartialEq, Eq)]
pub struct Launch {
    /// Absolute path of the quiz document, when running as a quiz.
    pub quiz_path: Option<PathBuf>,
    /// Arguments for the host REPL.
    pub host_args: Vec<String>,
}

/// Pull `--quiz <path>` out of `argv` before the host parses anything.
///
/// The path is resolved against `cwd`, and the pair is replaced in place by
/// `--config <profile>` so the host runs with the quiz settings profile.
/// Without the flag the arguments pass through untouched.
///
/// # Errors
///
/// Returns `ArgsError::MissingValue` when `--quiz` is the last argument.
pub fn rewrite_quiz_args(
    argv: Vec<String>,
    cwd: &Path,
    profile: &Path,
) -> Result<Launch, ArgsError> {
    let Some(flag_at) = argv.iter().position(|arg| arg == QUIZ_FLAG) else {
        return Ok(Launch {
            quiz_path: None,
            host_args: argv,
        });
    };

    let mut host_args = argv;
    let raw = host_args
        .get(flag_at + 1)
        .cloned()
        .ok_or(ArgsError::MissingValue { flag: QUIZ_FLAG })?;

    host_args[flag_at] = CONFIG_FLAG.to_string();
    host_args[flag_at + 1] = profile.display().to_string();

    Ok(Launch {
        quiz_path: Some(cwd.join(raw)),
        host_args,
    })
}

/// Flags understood by the host REPL.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HostArgs {
    pub config: Option<PathBuf>,
    pub db_url: Option<String>,
    pub help: bool,
}

impl HostArgs {
    /// Parse host flags. The last `--config`/`--db` wins.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or missing values.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                CONFIG_FLAG => {
                    parsed.config = Some(PathBuf::from(require_value(&mut args, CONFIG_FLAG)?));
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = Some(value);
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sql-quiz [--quiz <quiz.yaml>] [--config <profile.toml>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Without --quiz, runs as a plain SQL prompt.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite::memory:");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SQL_QUIZ_DB_URL, SQL_QUIZ_CONFIG, RUST_LOG");
}

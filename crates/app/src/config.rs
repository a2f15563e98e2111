use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::args::HostArgs;

pub const DEFAULT_DB_URL: &str = "sqlite::memory:";

/// Name `--quiz` passes as `--config`; resolves to the profile compiled into the binary.
pub const BUNDLED_QUIZ_PROFILE: &str = "bundled:quizrc.toml";

const QUIZ_PROFILE_TOML: &str = include_str!("../quizrc.toml");

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read profile {}: {source}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "invalid profile {}: {message}", path.display())
            }
            ConfigError::InvalidDbUrl { raw } => write!(f, "invalid database url: {raw}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings profile of the host REPL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub database_url: String,
    pub prompt: String,
    pub history_file: Option<PathBuf>,
    pub highlight: bool,
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DB_URL.to_string(),
            prompt: "sql> ".to_string(),
            history_file: None,
            highlight: true,
            log_level: "warn".to_string(),
        }
    }
}

impl HostConfig {
    /// Read a TOML profile. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path == Path::new(BUNDLED_QUIZ_PROFILE) {
            return Self::from_toml_str(QUIZ_PROFILE_TOML, path);
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Parse profile text; `origin` only names the profile in errors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not a valid profile.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build the effective configuration.
    ///
    /// Profile: `--config`, else `SQL_QUIZ_CONFIG`, else defaults. The database
    /// URL is then overridden by `SQL_QUIZ_DB_URL` and finally by `--db`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the selected profile is unusable.
    pub fn resolve(args: &HostArgs) -> Result<Self, ConfigError> {
        let profile = args
            .config
            .clone()
            .or_else(|| std::env::var("SQL_QUIZ_CONFIG").ok().map(PathBuf::from));

        let mut config = match profile {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("SQL_QUIZ_DB_URL") {
            if url.trim().is_empty() {
                warn!("SQL_QUIZ_DB_URL is set but empty; ignoring");
            } else {
                config.database_url = url;
            }
        }
        if let Some(url) = &args.db_url {
            config.database_url.clone_from(url);
        }

        config.database_url = normalize_sqlite_url(&config.database_url);
        Ok(config)
    }
}

/// Make file-backed URLs absolute so the database does not depend on the cwd.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == DEFAULT_DB_URL || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file (and its parent directories) if it does not exist.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDbUrl` for URLs without a path, or an I/O error
/// if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == DEFAULT_DB_URL {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::rewrite_quiz_args;

    #[test]
    fn profile_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizrc.toml");
        std::fs::write(&path, "prompt = \"quiz> \"\nhighlight = false\n").unwrap();

        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config.prompt, "quiz> ");
        assert!(!config.highlight);
        assert_eq!(config.database_url, DEFAULT_DB_URL);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn bundled_quiz_profile_parses() {
        let config = HostConfig::load(Path::new(BUNDLED_QUIZ_PROFILE)).unwrap();
        assert_eq!(config.prompt, "quiz> ");
    }

    #[test]
    fn quiz_launch_uses_embedded_profile() {
        let launch = rewrite_quiz_args(
            vec!["--quiz".into(), "q.yaml".into()],
            Path::new("/nonexistent/checkout"),
            Path::new(BUNDLED_QUIZ_PROFILE),
        )
        .unwrap();
        let args = HostArgs::parse(launch.host_args).unwrap();
        assert_eq!(args.config.as_deref(), Some(Path::new(BUNDLED_QUIZ_PROFILE)));

        let config = HostConfig::resolve(&args).unwrap();
        assert_eq!(config.prompt, "quiz> ");
        assert!(config.highlight);
    }

    #[test]
    fn malformed_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "highlight = \"sometimes\"").unwrap();
        assert!(matches!(
            HostConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn db_flag_overrides_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizrc.toml");
        std::fs::write(&path, "database_url = \"sqlite://from-profile.db\"\n").unwrap();

        let args = HostArgs {
            config: Some(path),
            db_url: Some("sqlite:///tmp/from-flag.db".into()),
            help: false,
        };
        let config = HostConfig::resolve(&args).unwrap();
        assert_eq!(config.database_url, "sqlite:///tmp/from-flag.db");
    }

    #[test]
    fn relative_urls_become_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///a/b.db"), "sqlite:///a/b.db");
        assert_eq!(normalize_sqlite_url("/a/b.db"), "sqlite:///a/b.db");
        assert!(normalize_sqlite_url("sqlite:b.db").ends_with("/b.db"));
    }

    #[test]
    fn prepare_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("quiz.db");
        let url = format!("sqlite://{}", db.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(db.exists());
        prepare_sqlite_file(DEFAULT_DB_URL).unwrap();
    }
}

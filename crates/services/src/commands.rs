//! Command surface the quiz adds to a host REPL.

/// Learner commands, each backed by one session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizCommand {
    Question,
    Next,
    Solution,
    ExportClosedQuiz,
}

impl QuizCommand {
    pub const ALL: [Self; 4] = [
        Self::Question,
        Self::Next,
        Self::Solution,
        Self::ExportClosedQuiz,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Question => "\\question",
            Self::Next => "\\next",
            Self::Solution => "\\solution",
            Self::ExportClosedQuiz => "\\export_closed_quiz",
        }
    }

    #[must_use]
    pub fn help(self) -> &'static str {
        match self {
            Self::Question => "Show quiz question",
            Self::Next => "Move to next question",
            Self::Solution => "Show solution to problem",
            Self::ExportClosedQuiz => "Export solution-free quiz",
        }
    }

    /// Usage line as shown in help listings.
    #[must_use]
    pub fn syntax(self) -> &'static str {
        match self {
            Self::ExportClosedQuiz => "\\export_closed_quiz <path>",
            other => other.name(),
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    #[must_use]
    pub fn spec(self) -> CommandSpec {
        CommandSpec {
            name: self.name(),
            syntax: self.syntax(),
            help: self.help(),
        }
    }
}

/// What a host needs to list and route one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub syntax: &'static str,
    pub help: &'static str,
}

/// Registration surface exposed by the host REPL.
pub trait CommandRegistry {
    fn register(&mut self, spec: CommandSpec);
}

/// Dialog or notification surface of the host.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, text: &str);
}

/// Syntax highlighting applied to revealed solutions.
pub trait SolutionHighlighter: Send + Sync {
    fn highlight(&self, sql: &str) -> String;
}

/// Leaves SQL untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl SolutionHighlighter for PlainHighlighter {
    fn highlight(&self, sql: &str) -> String {
        sql.to_owned()
    }
}

/// Split a `\name args...` line into the command name and the raw argument text.
#[must_use]
pub fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if !line.starts_with('\\') {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((name, args)) => Some((name, args.trim())),
        None => Some((line, "")),
    }
}

/// Destination path for an export: the first whitespace-delimited token.
#[must_use]
pub fn export_destination(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for cmd in QuizCommand::ALL {
            assert_eq!(QuizCommand::from_name(cmd.name()), Some(cmd));
        }
        assert_eq!(QuizCommand::from_name("\\nope"), None);
    }

    #[test]
    fn split_command_separates_args() {
        assert_eq!(split_command("\\next"), Some(("\\next", "")));
        assert_eq!(
            split_command("  \\export_closed_quiz  out.yaml extra "),
            Some(("\\export_closed_quiz", "out.yaml extra"))
        );
        assert_eq!(split_command("SELECT 1;"), None);
    }

    #[test]
    fn export_destination_takes_first_token() {
        assert_eq!(export_destination("out.yaml extra"), Some("out.yaml"));
        assert_eq!(export_destination("   "), None);
    }
}

use quiz_core::model::{ExpectedOutput, Question};

/// Shown when advancing past the last question.
pub const COMPLETION_MESSAGE: &str = "\nAll done! Congrats!";

pub const SUCCESS_TITLE: &str = "Success!";
pub const SUCCESS_TEXT: &str = "You can continue to the next question with \\next";

const TITLE_STYLE: &str = "\x1b[38;5;47;01m";
const TITLE_RESET: &str = "\x1b[39;00m";
const ROW_INDENT: &str = "    ";

/// Metadata shown when a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Welcome {
    pub title: String,
    pub description: String,
    pub question_count: usize,
}

/// Learner-facing text for a question: title, prompt and the rows to produce.
#[must_use]
pub fn full_prompt(question: &Question, expected: &ExpectedOutput) -> String {
    let rows = expected
        .rows()
        .iter()
        .map(|row| format!("{ROW_INDENT}{row}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\n{TITLE_STYLE}{title}{TITLE_RESET}\n\n{prompt}\n\nThis should return:\n\n{rows}\n",
        title = question.title(),
        prompt = question.prompt(),
    )
}

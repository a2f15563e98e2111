use std::path::Path;

use quiz_core::QuizError;
use quiz_core::model::{ExpectedOutput, Question, QuestionBody, QuizDocument, QuizMode};
use serde::{Deserialize, Serialize};

use crate::repository::LoadError;

/// Reference solution as authored: one statement string, or a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SolutionText {
    Text(String),
    Lines(Vec<String>),
}

impl SolutionText {
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.join("\n"),
        }
    }
}

/// Persisted shape of a question.
///
/// Mirrors the domain `Question` with optional fields; `into_question` decides
/// which variant the fields describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub title: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<SolutionText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<ExpectedOutput>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let (solution, expected) = match question.body() {
            QuestionBody::Open { solution, expected } => {
                (Some(SolutionText::Text(solution.clone())), expected.clone())
            }
            QuestionBody::Closed { expected } => (None, Some(expected.clone())),
        };

        Self {
            title: question.title().to_owned(),
            prompt: question.prompt().to_owned(),
            solution,
            expected,
        }
    }

    /// Convert the record into a domain question for a quiz in `mode`.
    ///
    /// Open questions derive their expected output at runtime, so an authored
    /// `expected` on an open question is dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the fields do not fit the mode.
    pub fn into_question(self, index: usize, mode: QuizMode) -> Result<Question, QuizError> {
        match mode {
            QuizMode::Open => {
                let solution = self.solution.ok_or(QuizError::MissingSolution { index })?;
                if self.expected.is_some() {
                    tracing::warn!(index, "ignoring authored expected output on open question");
                }
                Ok(Question::open(self.title, self.prompt, solution.into_text()))
            }
            QuizMode::Closed => {
                if self.solution.is_some() {
                    return Err(QuizError::UnexpectedSolution { index });
                }
                let expected = self.expected.ok_or(QuizError::MissingExpected { index })?;
                Ok(Question::closed(self.title, self.prompt, expected))
            }
        }
    }
}

/// Persisted shape of a quiz document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub title: String,
    pub description: String,
    pub closed: bool,
    pub questions: Vec<QuestionRecord>,
}

impl QuizRecord {
    #[must_use]
    pub fn from_document(document: &QuizDocument) -> Self {
        Self {
            title: document.title().to_owned(),
            description: document.description().to_owned(),
            closed: document.mode().is_closed(),
            questions: document
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
        }
    }

    /// Convert the record back into a validated document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Invalid` for any question that does not fit the
    /// document mode, or for an empty question list.
    pub fn into_document(self, source_path: &Path) -> Result<QuizDocument, LoadError> {
        let mode = QuizMode::from_closed_flag(self.closed);
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_question(index, mode))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QuizDocument::new(
            self.title,
            self.description,
            mode,
            questions,
            source_path,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StorageError;

    fn record(solution: Option<&str>, expected: Option<&[&str]>) -> QuestionRecord {
        QuestionRecord {
            title: "Q".into(),
            prompt: "P".into(),
            solution: solution.map(|s| SolutionText::Text(s.into())),
            expected: expected
                .map(|rows| ExpectedOutput::new(rows.iter().map(|r| (*r).to_string()).collect())),
        }
    }

    #[test]
    fn solution_lines_join_with_newlines() {
        let lines = SolutionText::Lines(vec!["SELECT *".into(), "FROM t;".into()]);
        assert_eq!(lines.into_text(), "SELECT *\nFROM t;");
    }

    #[test]
    fn open_question_requires_solution() {
        let err = record(None, None).into_question(3, QuizMode::Open).unwrap_err();
        assert_eq!(err, QuizError::MissingSolution { index: 3 });
    }

    #[test]
    fn open_question_drops_authored_expected() {
        let q = record(Some("SELECT 1"), Some(&["1"]))
            .into_question(0, QuizMode::Open)
            .unwrap();
        assert!(q.expected().is_none());
    }

    #[test]
    fn closed_question_requires_expected() {
        let err = record(None, None).into_question(0, QuizMode::Closed).unwrap_err();
        assert_eq!(err, QuizError::MissingExpected { index: 0 });
    }

    #[test]
    fn closed_question_rejects_solution() {
        let err = record(Some("SELECT 1"), Some(&["1"]))
            .into_question(1, QuizMode::Closed)
            .unwrap_err();
        assert_eq!(err, QuizError::UnexpectedSolution { index: 1 });
    }

    #[test]
    fn empty_question_list_is_invalid() {
        let quiz = QuizRecord {
            title: "t".into(),
            description: "d".into(),
            closed: false,
            questions: Vec::new(),
        };
        let err = quiz.into_document(Path::new("q.yaml")).unwrap_err();
        assert!(matches!(err, StorageError::Invalid(QuizError::NoQuestions)));
    }

    #[test]
    fn closed_record_omits_solution_field() {
        let document = QuizDocument::new(
            "t",
            "d",
            QuizMode::Closed,
            vec![Question::closed("Q", "P", ExpectedOutput::new(vec!["1".into()]))],
            "q.yaml",
        )
        .unwrap();
        let yaml = serde_yaml::to_string(&QuizRecord::from_document(&document)).unwrap();
        assert!(!yaml.contains("solution"));
        assert!(yaml.contains("closed: true"));
    }
}

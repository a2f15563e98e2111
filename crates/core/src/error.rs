use thiserror::Error;

/// Violations of the quiz document invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {index} has no solution but the quiz is open")]
    MissingSolution { index: usize },

    #[error("question {index} has no expected output")]
    MissingExpected { index: usize },

    #[error("question {index} carries a solution but the quiz is closed")]
    UnexpectedSolution { index: usize },
}

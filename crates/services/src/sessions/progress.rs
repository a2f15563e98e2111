/// Where the learner is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    NotStarted,
    Active(usize),
    /// Reached by advancing past the last question; the cursor stays on it.
    Finished(usize),
}

impl Progress {
    /// Index of the current question, if the quiz has started.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::NotStarted => None,
            Self::Active(index) | Self::Finished(index) => Some(index),
        }
    }
}

/// Aggregated view of quiz progress, useful for prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub is_finished: bool,
}

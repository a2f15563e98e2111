use crate::model::output::ExpectedOutput;

//
// ─── QUESTION BODY ─────────────────────────────────────────────────────────────
//

/// What a question carries besides its display text.
///
/// Open questions hold the reference solution and derive their expected output
/// at runtime. Closed questions ship the expected output and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionBody {
    Open {
        solution: String,
        expected: Option<ExpectedOutput>,
    },
    Closed {
        expected: ExpectedOutput,
    },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    title: String,
    prompt: String,
    body: QuestionBody,
}

impl Question {
    /// Authoring form: the expected output is derived later from `solution`.
    #[must_use]
    pub fn open(
        title: impl Into<String>,
        prompt: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            body: QuestionBody::Open {
                solution: solution.into(),
                expected: None,
            },
        }
    }

    /// Distribution form: only the expected output is known.
    #[must_use]
    pub fn closed(
        title: impl Into<String>,
        prompt: impl Into<String>,
        expected: ExpectedOutput,
    ) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            body: QuestionBody::Closed { expected },
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn body(&self) -> &QuestionBody {
        &self.body
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.body, QuestionBody::Open { .. })
    }

    /// Reference solution, only present on open questions.
    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        match &self.body {
            QuestionBody::Open { solution, .. } => Some(solution),
            QuestionBody::Closed { .. } => None,
        }
    }

    /// Expected output, if it has been authored or derived.
    #[must_use]
    pub fn expected(&self) -> Option<&ExpectedOutput> {
        match &self.body {
            QuestionBody::Open { expected, .. } => expected.as_ref(),
            QuestionBody::Closed { expected } => Some(expected),
        }
    }

    /// A question can be answered once its expected output exists.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        self.expected().is_some()
    }

    pub(crate) fn attach_expected(&mut self, output: ExpectedOutput) {
        if let QuestionBody::Open { expected, .. } = &mut self.body {
            *expected = Some(output);
        }
    }

    /// Closed copy of this question, or `None` if no expected output exists yet.
    pub(crate) fn to_closed(&self) -> Option<Self> {
        self.expected().map(|expected| Self {
            title: self.title.clone(),
            prompt: self.prompt.clone(),
            body: QuestionBody::Closed {
                expected: expected.clone(),
            },
        })
    }
}

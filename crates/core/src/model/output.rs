use serde::{Deserialize, Serialize};

/// Result of running one statement through an executor.
///
/// `output` holds the result rows in the executor's canonical string form and
/// `query` the statement as the executor understood it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub output: Vec<String>,
    pub query: String,
}

impl Evaluation {
    #[must_use]
    pub fn new(output: Vec<String>, query: impl Into<String>) -> Self {
        Self {
            output,
            query: query.into(),
        }
    }
}

/// Canonical rows a correct answer must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedOutput(Vec<String>);

impl ExpectedOutput {
    #[must_use]
    pub fn new(rows: Vec<String>) -> Self {
        Self(rows)
    }

    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact, order-sensitive comparison against a learner's output.
    ///
    /// Rows are compared as-is; whitespace and case are significant.
    #[must_use]
    pub fn matches(&self, output: &[String]) -> bool {
        self.0.as_slice() == output
    }
}

impl From<Vec<String>> for ExpectedOutput {
    fn from(rows: Vec<String>) -> Self {
        Self(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn matches_identical_rows() {
        let expected = ExpectedOutput::new(rows(&["1 | a", "2 | b"]));
        assert!(expected.matches(&rows(&["1 | a", "2 | b"])));
    }

    #[test]
    fn reordered_rows_do_not_match() {
        let expected = ExpectedOutput::new(rows(&["1 | a", "2 | b"]));
        assert!(!expected.matches(&rows(&["2 | b", "1 | a"])));
    }

    #[test]
    fn length_mismatch_does_not_match() {
        let expected = ExpectedOutput::new(rows(&["1"]));
        assert!(!expected.matches(&rows(&["1", "1"])));
        assert!(!expected.matches(&[]));
    }

    #[test]
    fn whitespace_and_case_are_significant() {
        let expected = ExpectedOutput::new(rows(&["Alice"]));
        assert!(!expected.matches(&rows(&["alice"])));
        assert!(!expected.matches(&rows(&["Alice "])));
    }

    #[test]
    fn empty_expected_matches_only_empty_output() {
        let expected = ExpectedOutput::new(Vec::new());
        assert!(expected.matches(&[]));
        assert!(!expected.matches(&rows(&[""])));
    }
}

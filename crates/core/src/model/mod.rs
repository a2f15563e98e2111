mod output;
mod question;
mod quiz;

pub use output::{Evaluation, ExpectedOutput};
pub use question::{Question, QuestionBody};
pub use quiz::{QuizDocument, QuizMode};

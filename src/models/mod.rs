mod question;
mod word;

pub use question::{AnswerOutcome, AnswerState, Question, QuizMode, QuizType};
pub use word::{Book, BookSummary, WordItem};

/// Which screen the terminal front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Picking a book and a quiz mode.
    Selecting,
    /// A quiz session is running.
    Quiz,
    /// Reviewing the finished session.
    Result,
    /// Working through flashcards.
    Learning,
}

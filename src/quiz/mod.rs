//! The quiz engine.
//!
//! [`generator`] turns a word pool into questions, [`QuizSession`] holds the
//! state of one attempt and [`QuizController`] runs it against a countdown
//! and the outside collaborators.

mod controller;
pub mod generator;
mod scoring;
mod session;
mod snapshot;
mod spelling;
mod timer;

pub use controller::QuizController;
pub use generator::{generate_questions, InsufficientWords};
pub use scoring::{points_for_combo, ComboState};
pub use session::{Advance, Phase, QuizSession, SessionSettings, DEFAULT_TIME_LIMIT_TENTHS};
pub use snapshot::{QuestionView, SessionSnapshot};
pub use spelling::SpellingState;
pub use timer::{QuestionTimer, TimerEvent, TICK_INTERVAL};

//! # vocab-quiz
//!
//! Vocabulary flashcards and timed quizzes in the terminal.
//!
//! The engine lives in [`quiz`]: a [`QuizController`] draws questions from a
//! book's word pool, scores answers with a combo multiplier, runs a countdown
//! per question and records the session history. [`learn`] holds the
//! flashcard loop, [`data`] the book storage, and the rest of the crate is
//! the terminal front end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vocab_quiz::{App, Config, Launch, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::load(None)?;
//!     let mut app = App::from_config(&config);
//!     app.launch(Launch::Select);
//!     vocab_quiz::run(app).await
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod feedback;
pub mod learn;
mod models;
pub mod quiz;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub use app::{App, Launch};
pub use config::{Config, ConfigError};
pub use data::{LoadError, WordPoolProvider};
pub use models::{
    AnswerOutcome, AnswerState, AppState, Book, BookSummary, Question, QuizMode, QuizType,
    WordItem,
};
pub use quiz::{InsufficientWords, QuizController, QuizSession, SessionSnapshot};

/// How long to wait for a key before applying countdown events.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error reading or writing a book.
    Load(LoadError),
    /// The book has too few words for a quiz.
    InsufficientWords(InsufficientWords),
    /// Error in the configuration file.
    Config(ConfigError),
    /// IO error while driving the terminal.
    Io(io::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load words: {}", e),
            QuizError::InsufficientWords(e) => write!(f, "{}", e),
            QuizError::Config(e) => write!(f, "{}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::InsufficientWords(e) => Some(e),
            QuizError::Config(e) => Some(e),
            QuizError::Io(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<InsufficientWords> for QuizError {
    fn from(err: InsufficientWords) -> Self {
        QuizError::InsufficientWords(err)
    }
}

impl From<ConfigError> for QuizError {
    fn from(err: ConfigError) -> Self {
        QuizError::Config(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

/// Take over the terminal and run `app` until the user quits.
///
/// Must be called inside a multi-threaded tokio runtime: question
/// countdowns run as tasks while this loop blocks on input.
pub async fn run(mut app: App) -> Result<(), QuizError> {
    let mut terminal = terminal::TerminalGuard::enter()?;
    let result = run_event_loop(&mut terminal, &mut app);
    app.shutdown();
    result
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.tick();
        app.sync_phase();
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(INPUT_POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => true,
            KeyCode::Char('p') => {
                app.replay_audio();
                false
            }
            _ => false,
        };
    }

    match app.state {
        AppState::Selecting => handle_selecting_input(app, key.code),
        AppState::Quiz => handle_quiz_input(app, key.code),
        AppState::Result => handle_result_input(app, key.code),
        AppState::Learning => handle_learning_input(app, key.code),
    }
}

fn handle_selecting_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_book(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_book(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next_mode(),
        KeyCode::Left | KeyCode::Char('h') => app.select_previous_mode(),
        KeyCode::Enter => app.start_quiz(),
        KeyCode::Char('f') => app.start_learning(false),
        KeyCode::Char('F') => app.start_learning(true),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::Esc {
        app.leave_quiz();
        return false;
    }
    if key == KeyCode::Enter {
        app.confirm();
        return false;
    }

    if app.is_spelling() {
        match key {
            KeyCode::Char(c) => app.type_char(c),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Tab => app.use_hint(),
            _ => {}
        }
        return false;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(' ') => app.confirm(),
        _ => {}
    }
    false
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_learning_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char(' ') | KeyCode::Enter => app.reveal_card(),
        KeyCode::Char('y') => app.mark_known(),
        KeyCode::Char('n') => app.mark_unknown(),
        KeyCode::Char('s') => app.toggle_favorite(),
        KeyCode::Esc => app.leave_learning(),
        _ => {}
    }
    false
}

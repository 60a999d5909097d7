use std::sync::Arc;

use crate::config::Config;
use crate::data::{JsonBookStore, WordPoolProvider};
use crate::feedback::{AudioPlayer, CommandAudioPlayer, Haptics, NoHaptics, TerminalBell};
use crate::learn::FlashcardDeck;
use crate::models::{AppState, BookSummary, QuizMode};
use crate::quiz::{Advance, Phase, QuizController};

/// Screen to open first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    Select,
    Quiz { book_id: String, mode: QuizMode },
    Learn { book_id: String, include_learned: bool },
}

pub struct App {
    pub state: AppState,
    store: Arc<dyn WordPoolProvider>,
    audio: Arc<dyn AudioPlayer>,
    controller: QuizController,
    books: Vec<BookSummary>,
    selected_book: usize,
    selected_mode: usize,
    selected_option: usize,
    result_scroll: usize,
    deck: Option<FlashcardDeck>,
    status: Option<String>,
}

impl App {
    pub fn new(
        store: Arc<dyn WordPoolProvider>,
        audio: Arc<dyn AudioPlayer>,
        controller: QuizController,
    ) -> Self {
        let mut app = Self {
            state: AppState::Selecting,
            store,
            audio,
            controller,
            books: Vec::new(),
            selected_book: 0,
            selected_mode: 0,
            selected_option: 0,
            result_scroll: 0,
            deck: None,
            status: None,
        };
        app.refresh_books();
        app
    }

    /// Wire the JSON store and the configured feedback devices.
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn WordPoolProvider> = Arc::new(JsonBookStore::new(&config.books_dir));
        let audio: Arc<dyn AudioPlayer> = Arc::new(CommandAudioPlayer::new(
            config.audio.player.clone(),
            config.audio.speech.clone(),
        ));
        let haptics: Arc<dyn Haptics> = if config.haptics {
            Arc::new(TerminalBell)
        } else {
            Arc::new(NoHaptics)
        };
        let controller = QuizController::new(
            store.clone(),
            audio.clone(),
            haptics,
            config.quiz.session_settings(),
        );
        Self::new(store, audio, controller)
    }

    pub fn launch(&mut self, launch: Launch) {
        match launch {
            Launch::Select => {}
            Launch::Quiz { book_id, mode } => self.start_quiz_on(&book_id, mode),
            Launch::Learn {
                book_id,
                include_learned,
            } => self.start_learning_on(&book_id, include_learned),
        }
    }

    pub fn refresh_books(&mut self) {
        match self.store.books() {
            Ok(books) => {
                self.books = books;
                self.selected_book = self.selected_book.min(self.books.len().saturating_sub(1));
            }
            Err(e) => {
                tracing::warn!("Could not list books: {}", e);
                self.books.clear();
                self.status = Some(format!("Could not list books: {}", e));
            }
        }
    }

    pub fn books(&self) -> &[BookSummary] {
        &self.books
    }

    pub fn selected_book(&self) -> usize {
        self.selected_book
    }

    pub fn selected_mode(&self) -> QuizMode {
        QuizMode::ALL[self.selected_mode]
    }

    /// Message for the selection screen, e.g. why a quiz did not start.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn controller(&self) -> &QuizController {
        &self.controller
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn deck(&self) -> Option<&FlashcardDeck> {
        self.deck.as_ref()
    }

    pub fn select_next_book(&mut self) {
        if !self.books.is_empty() {
            self.selected_book = (self.selected_book + 1) % self.books.len();
        }
    }

    pub fn select_previous_book(&mut self) {
        if !self.books.is_empty() {
            self.selected_book = (self.selected_book + self.books.len() - 1) % self.books.len();
        }
    }

    pub fn select_next_mode(&mut self) {
        self.selected_mode = (self.selected_mode + 1) % QuizMode::ALL.len();
    }

    pub fn select_previous_mode(&mut self) {
        self.selected_mode = (self.selected_mode + QuizMode::ALL.len() - 1) % QuizMode::ALL.len();
    }

    pub fn start_quiz(&mut self) {
        let Some(book) = self.books.get(self.selected_book) else {
            self.status = Some("No books found".to_string());
            return;
        };
        let book_id = book.id.clone();
        self.start_quiz_on(&book_id, self.selected_mode());
    }

    pub fn start_quiz_on(&mut self, book_id: &str, mode: QuizMode) {
        match self.controller.start(book_id, mode) {
            Ok(()) => {
                self.status = None;
                self.selected_option = 0;
                self.result_scroll = 0;
                self.state = AppState::Quiz;
            }
            Err(e) => {
                tracing::warn!("Quiz on {} did not start: {}", book_id, e);
                self.status = Some(e.to_string());
                self.state = AppState::Selecting;
            }
        }
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Whether the active question is a spelling question.
    pub fn is_spelling(&self) -> bool {
        self.controller
            .session()
            .and_then(|s| s.current_question())
            .is_some_and(|q| q.is_spelling())
    }

    /// Answer the active question, or move on if it is already resolved.
    pub fn confirm(&mut self) {
        let Some(session) = self.controller.session() else {
            return;
        };

        if session.is_awaiting_answer() {
            if self.is_spelling() {
                self.controller.submit();
            } else if let Some(option) = session
                .current_question()
                .and_then(|q| q.options.get(self.selected_option))
                .cloned()
            {
                self.controller.answer(&option);
            }
            return;
        }

        match self.controller.next() {
            Some(Advance::Next(_)) => self.selected_option = 0,
            Some(Advance::Finished) => {
                self.result_scroll = 0;
                self.state = AppState::Result;
            }
            Some(Advance::Pending) | None => {}
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(session) = self.controller.session() {
            let mut input = session.spelling().input().to_string();
            input.push(c);
            self.controller.update_input(&input);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(session) = self.controller.session() {
            let mut input = session.spelling().input().to_string();
            input.pop();
            self.controller.update_input(&input);
        }
    }

    pub fn use_hint(&mut self) {
        self.controller.use_hint();
    }

    /// Play the word on screen: the active question, or the current flashcard.
    pub fn replay_audio(&mut self) {
        match (&self.state, &self.deck) {
            (AppState::Learning, Some(deck)) => {
                if let Some(word) = deck.current() {
                    self.audio.play(&word.audio_url, &word.word);
                }
            }
            _ => {
                self.controller.replay_audio();
            }
        }
    }

    /// Apply pending countdown events. Returns true if anything changed.
    pub fn tick(&mut self) -> bool {
        self.controller.pump_timer_events()
    }

    /// Abandon the running quiz and go back to selection.
    pub fn leave_quiz(&mut self) {
        self.controller.quit();
        self.state = AppState::Selecting;
        self.refresh_books();
    }

    pub fn scroll_results_down(&mut self) {
        let len = self
            .controller
            .session()
            .map_or(0, |s| s.history().len());
        if self.result_scroll + 1 < len {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn start_learning(&mut self, include_learned: bool) {
        let Some(book) = self.books.get(self.selected_book) else {
            self.status = Some("No books found".to_string());
            return;
        };
        let book_id = book.id.clone();
        self.start_learning_on(&book_id, include_learned);
    }

    pub fn start_learning_on(&mut self, book_id: &str, include_learned: bool) {
        match self.store.words(book_id) {
            Ok(words) => {
                let mut deck = FlashcardDeck::new(book_id, words, include_learned);
                deck.shuffle(&mut rand::rng());
                if deck.is_finished() {
                    self.status = Some("Every word in this book is learned".to_string());
                    return;
                }
                tracing::info!("Studying {} flashcards from {}", deck.progress().1, book_id);
                self.deck = Some(deck);
                self.status = None;
                self.state = AppState::Learning;
            }
            Err(e) => {
                tracing::warn!("Could not open {} for study: {}", book_id, e);
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn reveal_card(&mut self) {
        if let Some(deck) = &mut self.deck {
            deck.reveal();
        }
    }

    pub fn mark_known(&mut self) {
        if let Some(deck) = &mut self.deck {
            deck.mark_known();
        }
    }

    pub fn mark_unknown(&mut self) {
        if let Some(deck) = &mut self.deck {
            deck.mark_unknown();
        }
    }

    pub fn toggle_favorite(&mut self) {
        if let Some(deck) = &mut self.deck {
            deck.toggle_favorite();
        }
    }

    /// Save flashcard progress and go back to selection.
    pub fn leave_learning(&mut self) {
        if let Some(deck) = self.deck.take() {
            let book_id = deck.book_id().to_string();
            if let Err(e) = self.store.save_words(&book_id, deck.words()) {
                tracing::warn!("Could not save progress for {}: {}", book_id, e);
                self.status = Some(format!("Progress not saved: {}", e));
            }
        }
        self.state = AppState::Selecting;
        self.refresh_books();
    }

    /// Close the result screen.
    pub fn restart(&mut self) {
        self.leave_quiz();
    }

    /// Release the current screen's resources before exiting.
    pub fn shutdown(&mut self) {
        match self.state {
            AppState::Learning => self.leave_learning(),
            AppState::Quiz | AppState::Result => self.controller.quit(),
            AppState::Selecting => {}
        }
    }

    fn option_count(&self) -> usize {
        self.controller
            .session()
            .and_then(|s| s.current_question())
            .map_or(0, |q| q.options.len())
    }

    /// Keep the screen in step with the quiz phase.
    pub fn sync_phase(&mut self) {
        if self.state == AppState::Quiz && self.controller.phase() == Phase::Finished {
            self.state = AppState::Result;
        }
    }
}

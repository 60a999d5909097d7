//! Quiz session state.
//!
//! A [`QuizSession`] is the `Active`/`Finished` part of the quiz flow. It
//! is a plain state machine: nothing in here spawns tasks or touches I/O,
//! so every transition can be driven directly. The countdown is fed in
//! from outside through [`QuizSession::set_time_remaining`] and
//! [`QuizSession::timeout`].

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AnswerOutcome, AnswerState, Question, QuizMode, WordItem};

use super::generator::{generate_questions, InsufficientWords};
use super::scoring::ComboState;
use super::spelling::SpellingState;

/// Per-question time limit, in tenths of a time unit.
pub const DEFAULT_TIME_LIMIT_TENTHS: u32 = 150;

/// Where the quiz flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No session exists.
    Selecting,
    Active,
    Finished,
}

/// Result of asking to move past the active question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The active question is still unanswered.
    Pending,
    /// Moved on to the question at this index.
    Next(usize),
    Finished,
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub question_count: usize,
    pub time_limit_tenths: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_count: super::generator::DEFAULT_QUESTION_COUNT,
            time_limit_tenths: DEFAULT_TIME_LIMIT_TENTHS,
        }
    }
}

/// One quiz attempt.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    book_id: String,
    mode: QuizMode,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    combo: ComboState,
    answer_state: AnswerState,
    /// Option the user picked for the active question.
    selected: Option<String>,
    spelling: SpellingState,
    time_limit_tenths: u32,
    time_remaining_tenths: u32,
    history: Vec<AnswerOutcome>,
    finished: bool,
}

impl QuizSession {
    /// Generate the questions and enter the first one.
    pub fn start<R: Rng + ?Sized>(
        book_id: &str,
        pool: &[WordItem],
        mode: QuizMode,
        settings: SessionSettings,
        rng: &mut R,
    ) -> Result<Self, InsufficientWords> {
        let questions = generate_questions(pool, mode, settings.question_count, rng)?;
        Ok(Self::with_questions(book_id, mode, questions, settings))
    }

    /// Build a session over an existing question list.
    pub fn with_questions(
        book_id: &str,
        mode: QuizMode,
        questions: Vec<Question>,
        settings: SessionSettings,
    ) -> Self {
        let finished = questions.is_empty();
        Self {
            id: Uuid::new_v4(),
            book_id: book_id.to_string(),
            mode,
            questions,
            current: 0,
            score: 0,
            combo: ComboState::default(),
            answer_state: AnswerState::Unanswered,
            selected: None,
            spelling: SpellingState::default(),
            time_limit_tenths: settings.time_limit_tenths,
            time_remaining_tenths: settings.time_limit_tenths,
            history: Vec::new(),
            finished,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else {
            Phase::Active
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active question, `None` once finished.
    pub fn current_question(&self) -> Option<&Question> {
        if self.finished {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> ComboState {
        self.combo
    }

    pub fn answer_state(&self) -> AnswerState {
        self.answer_state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn spelling(&self) -> &SpellingState {
        &self.spelling
    }

    pub fn time_limit_tenths(&self) -> u32 {
        self.time_limit_tenths
    }

    pub fn time_remaining_tenths(&self) -> u32 {
        self.time_remaining_tenths
    }

    /// Time left on the active question, in time units.
    pub fn time_remaining(&self) -> f32 {
        self.time_remaining_tenths as f32 / 10.0
    }

    pub fn history(&self) -> &[AnswerOutcome] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the active question still accepts an answer.
    pub fn is_awaiting_answer(&self) -> bool {
        !self.finished && !self.answer_state.is_answered()
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|o| o.correct).count()
    }

    /// Pick a multiple-choice option. Ignored once the question is resolved.
    pub fn answer(&mut self, option: &str) -> Option<AnswerOutcome> {
        let question = self.current_question()?;
        if question.is_spelling() || self.answer_state.is_answered() {
            return None;
        }

        let correct = option == question.expected();
        self.selected = Some(option.to_string());
        Some(self.resolve(correct, Some(option.to_string()), false))
    }

    /// Resolve the active question as missed because the clock ran out.
    pub fn timeout(&mut self) -> Option<AnswerOutcome> {
        if !self.is_awaiting_answer() {
            return None;
        }
        self.time_remaining_tenths = 0;
        Some(self.resolve(false, None, true))
    }

    /// Edit the spelling buffer. Returns false if the text is rejected.
    pub fn update_input(&mut self, text: &str) -> bool {
        match self.spelling_target() {
            Some(target) => self.spelling.update_input(text, &target),
            None => false,
        }
    }

    /// Reveal one more letter of the spelling target.
    pub fn use_hint(&mut self) -> bool {
        match self.spelling_target() {
            Some(target) => self.spelling.use_hint(&target),
            None => false,
        }
    }

    /// Check the spelling buffer against the headword.
    pub fn submit(&mut self) -> Option<AnswerOutcome> {
        let target = self.spelling_target()?;

        let correct = self.spelling.check(&target);
        if !correct {
            self.spelling.mark_error();
        }
        let given = self.spelling.input().trim().to_string();
        Some(self.resolve(correct, Some(given), false))
    }

    pub fn set_time_remaining(&mut self, tenths: u32) {
        if self.is_awaiting_answer() {
            self.time_remaining_tenths = tenths.min(self.time_limit_tenths);
        }
    }

    /// Move past a resolved question.
    pub fn next(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished;
        }
        if !self.answer_state.is_answered() {
            return Advance::Pending;
        }

        self.answer_state = AnswerState::Unanswered;
        self.selected = None;
        self.spelling = SpellingState::default();
        self.time_remaining_tenths = self.time_limit_tenths;

        if self.current + 1 >= self.questions.len() {
            self.finished = true;
            Advance::Finished
        } else {
            self.current += 1;
            Advance::Next(self.current)
        }
    }

    /// Headword of the active question if it is an unanswered spelling question.
    fn spelling_target(&self) -> Option<String> {
        if !self.is_awaiting_answer() {
            return None;
        }
        self.current_question()
            .filter(|question| question.is_spelling())
            .map(|question| question.word.word.clone())
    }

    fn resolve(&mut self, correct: bool, given: Option<String>, timed_out: bool) -> AnswerOutcome {
        let points = if correct {
            self.answer_state = AnswerState::Correct;
            self.combo.hit()
        } else {
            self.answer_state = AnswerState::Incorrect;
            self.combo.miss();
            0
        };
        self.score += points;

        let outcome = AnswerOutcome {
            question_index: self.current,
            word_id: self.questions[self.current].word.id,
            correct,
            given,
            timed_out,
            points,
        };

        if !self.history.iter().any(|o| o.question_index == self.current) {
            self.history.push(outcome.clone());
        }
        outcome
    }
}

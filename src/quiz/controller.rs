//! Drives one quiz attempt at a time.
//!
//! The controller owns the session, its countdown task and the
//! collaborators. Every transition runs on the caller's task; the
//! countdown only sends [`TimerEvent`]s, which are applied when the owner
//! pumps them. An answer aborts the countdown before it touches the
//! session, and a timer event is dropped unless it belongs to the active,
//! still unanswered question.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::{mpsc, watch};

use crate::data::WordPoolProvider;
use crate::feedback::{AudioPlayer, Feedback, Haptics};
use crate::models::{AnswerOutcome, QuizMode};
use crate::QuizError;

use super::session::{Advance, Phase, QuizSession, SessionSettings};
use super::snapshot::SessionSnapshot;
use super::timer::{QuestionTimer, TimerEvent};

pub struct QuizController {
    words: Arc<dyn WordPoolProvider>,
    audio: Arc<dyn AudioPlayer>,
    haptics: Arc<dyn Haptics>,
    settings: SessionSettings,
    session: Option<QuizSession>,
    timer: Option<QuestionTimer>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl QuizController {
    pub fn new(
        words: Arc<dyn WordPoolProvider>,
        audio: Arc<dyn AudioPlayer>,
        haptics: Arc<dyn Haptics>,
        settings: SessionSettings,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(SessionSnapshot::selecting());
        Self {
            words,
            audio,
            haptics,
            settings,
            session: None,
            timer: None,
            timer_tx,
            timer_rx,
            state_tx,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Selecting, QuizSession::phase)
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(self.session.as_ref())
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// Start a session on `book_id`, discarding any current one.
    pub fn start(&mut self, book_id: &str, mode: QuizMode) -> Result<(), QuizError> {
        let mut rng = rand::rng();
        self.start_with_rng(book_id, mode, &mut rng)
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        book_id: &str,
        mode: QuizMode,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        self.quit();

        let pool = self.words.words(book_id)?;
        let session = QuizSession::start(book_id, &pool, mode, self.settings, rng)?;
        tracing::info!(
            "Started {} quiz {} on book {} with {} questions",
            mode,
            session.id(),
            book_id,
            session.questions().len()
        );

        self.session = Some(session);
        self.enter_question();
        self.publish();
        Ok(())
    }

    /// Pick a multiple-choice option for the active question.
    pub fn answer(&mut self, option: &str) -> Option<AnswerOutcome> {
        let session = self.session.as_mut()?;
        let accepts = session.is_awaiting_answer()
            && session.current_question().is_some_and(|q| !q.is_spelling());
        if !accepts {
            return None;
        }

        cancel_timer(&mut self.timer);
        let outcome = session.answer(option);
        self.resolved(outcome)
    }

    pub fn update_input(&mut self, text: &str) -> bool {
        let changed = self
            .session
            .as_mut()
            .is_some_and(|session| session.update_input(text));
        if changed {
            self.publish();
        }
        changed
    }

    pub fn use_hint(&mut self) -> bool {
        let changed = self
            .session
            .as_mut()
            .is_some_and(|session| session.use_hint());
        if changed {
            self.publish();
        }
        changed
    }

    /// Check the spelling buffer of the active question.
    pub fn submit(&mut self) -> Option<AnswerOutcome> {
        let session = self.session.as_mut()?;
        let accepts = session.is_awaiting_answer()
            && session.current_question().is_some_and(|q| q.is_spelling());
        if !accepts {
            return None;
        }

        cancel_timer(&mut self.timer);
        let outcome = session.submit();
        self.resolved(outcome)
    }

    /// Move past the resolved question. `None` when no session exists.
    pub fn next(&mut self) -> Option<Advance> {
        let session = self.session.as_mut()?;
        let was_finished = session.is_finished();
        let advance = session.next();

        match advance {
            Advance::Pending => {}
            Advance::Next(_) => {
                cancel_timer(&mut self.timer);
                self.enter_question();
                self.publish();
            }
            Advance::Finished if !was_finished => {
                cancel_timer(&mut self.timer);
                if let Some(session) = &self.session {
                    tracing::info!(
                        "Finished quiz {}: {} points, {}/{} correct, best combo {}",
                        session.id(),
                        session.score(),
                        session.correct_count(),
                        session.questions().len(),
                        session.combo().best()
                    );
                }
                self.record_results();
                self.publish();
            }
            Advance::Finished => {}
        }
        Some(advance)
    }

    /// Drop the session from any phase.
    pub fn quit(&mut self) {
        cancel_timer(&mut self.timer);
        if let Some(session) = self.session.take() {
            tracing::info!("Left quiz {} at question {}", session.id(), session.current_index() + 1);
            self.publish();
        }
    }

    /// Play the active word's pronunciation again.
    pub fn replay_audio(&self) -> bool {
        let Some(question) = self.session.as_ref().and_then(QuizSession::current_question) else {
            return false;
        };
        self.audio.play(&question.word.audio_url, &question.word.word);
        true
    }

    /// Apply one countdown event. Returns true if the state changed.
    pub fn handle_timer_event(&mut self, event: TimerEvent) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let (id, question) = match event {
            TimerEvent::Tick { session, question, .. } => (session, question),
            TimerEvent::Expired { session, question } => (session, question),
        };
        if id != session.id() || question != session.current_index() || !session.is_awaiting_answer()
        {
            return false;
        }

        match event {
            TimerEvent::Tick { remaining_tenths, .. } => {
                session.set_time_remaining(remaining_tenths);
                self.publish();
                true
            }
            TimerEvent::Expired { .. } => {
                self.timer = None;
                tracing::debug!("Question {} timed out", question + 1);
                let outcome = session.timeout();
                self.resolved(outcome).is_some()
            }
        }
    }

    /// Apply all queued countdown events without waiting.
    pub fn pump_timer_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.timer_rx.try_recv() {
            changed |= self.handle_timer_event(event);
        }
        changed
    }

    /// Wait for the next countdown event and apply it.
    ///
    /// Pends forever while no countdown is running.
    pub async fn next_timer_event(&mut self) -> Option<TimerEvent> {
        let event = self.timer_rx.recv().await?;
        self.handle_timer_event(event);
        Some(event)
    }

    fn enter_question(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let Some(question) = session.current_question() else {
            return;
        };

        if question.quiz_type.is_audio() {
            self.audio.play(&question.word.audio_url, &question.word.word);
        }

        self.timer = Some(QuestionTimer::spawn(
            session.id(),
            session.current_index(),
            session.time_limit_tenths(),
            self.timer_tx.clone(),
        ));
    }

    fn resolved(&mut self, outcome: Option<AnswerOutcome>) -> Option<AnswerOutcome> {
        let outcome = outcome?;
        self.haptics.pulse(if outcome.correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        });
        tracing::debug!(
            question = outcome.question_index + 1,
            correct = outcome.correct,
            timed_out = outcome.timed_out,
            points = outcome.points,
            "Question resolved"
        );
        self.publish();
        Some(outcome)
    }

    /// Flag every missed word in the store.
    fn record_results(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let missed: HashSet<u32> = session
            .history()
            .iter()
            .filter(|o| !o.correct)
            .map(|o| o.word_id)
            .collect();
        if missed.is_empty() {
            return;
        }

        let book_id = session.book_id();
        let result = self.words.words(book_id).and_then(|mut words| {
            for word in words.iter_mut().filter(|w| missed.contains(&w.id)) {
                word.mark_wrong();
            }
            self.words.save_words(book_id, &words)
        });
        if let Err(e) = result {
            tracing::warn!("Could not record quiz results for book {}: {}", book_id, e);
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.snapshot());
    }
}

fn cancel_timer(timer: &mut Option<QuestionTimer>) {
    if let Some(timer) = timer.take() {
        timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::data::MemoryBookStore;
    use crate::models::{AnswerState, Book, QuizType, WordItem};

    #[derive(Default)]
    struct RecordingAudio {
        played: Mutex<Vec<(String, String)>>,
    }

    impl AudioPlayer for RecordingAudio {
        fn play(&self, url: &str, fallback_text: &str) {
            self.played
                .lock()
                .unwrap()
                .push((url.to_string(), fallback_text.to_string()));
        }
    }

    #[derive(Default)]
    struct RecordingHaptics {
        pulses: Mutex<Vec<Feedback>>,
    }

    impl Haptics for RecordingHaptics {
        fn pulse(&self, feedback: Feedback) {
            self.pulses.lock().unwrap().push(feedback);
        }
    }

    struct Harness {
        controller: QuizController,
        store: Arc<MemoryBookStore>,
        audio: Arc<RecordingAudio>,
        haptics: Arc<RecordingHaptics>,
        rng: StdRng,
    }

    impl Harness {
        fn new(word_count: u32) -> Self {
            let words = (0..word_count)
                .map(|i| {
                    let mut word = WordItem::new(i, &format!("word{}", i), &format!("gloss{}", i));
                    word.audio_url = format!("https://example.org/{}.mp3", i);
                    word
                })
                .collect();
            let store = Arc::new(MemoryBookStore::new().with_book(Book {
                id: "book".to_string(),
                name: "Book".to_string(),
                words,
            }));
            let audio = Arc::new(RecordingAudio::default());
            let haptics = Arc::new(RecordingHaptics::default());
            let controller = QuizController::new(
                store.clone(),
                audio.clone(),
                haptics.clone(),
                SessionSettings::default(),
            );
            Self {
                controller,
                store,
                audio,
                haptics,
                rng: StdRng::seed_from_u64(11),
            }
        }

        fn start(&mut self, mode: QuizMode) {
            self.controller
                .start_with_rng("book", mode, &mut self.rng)
                .unwrap();
        }

        fn expected(&self) -> String {
            let session = self.controller.session().unwrap();
            session.current_question().unwrap().expected().to_string()
        }

        fn wrong(&self) -> String {
            let session = self.controller.session().unwrap();
            let question = session.current_question().unwrap();
            question
                .options
                .iter()
                .find(|o| *o != question.expected())
                .cloned()
                .unwrap()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_small_book_does_not_start() {
        let mut h = Harness::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        let err = h
            .controller
            .start_with_rng("book", QuizMode::Mixed, &mut rng)
            .unwrap_err();

        assert!(matches!(err, QuizError::InsufficientWords(_)));
        assert_eq!(h.controller.phase(), Phase::Selecting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_book_is_a_load_error() {
        let mut h = Harness::new(5);
        let mut rng = StdRng::seed_from_u64(1);
        let err = h
            .controller
            .start_with_rng("missing", QuizMode::Mixed, &mut rng)
            .unwrap_err();
        assert!(matches!(err, QuizError::Load(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_times_out_the_question() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::EnToNative));

        let mut saw_tick = false;
        loop {
            match h.controller.next_timer_event().await {
                Some(TimerEvent::Tick { .. }) => {
                    saw_tick = true;
                    assert!(h.controller.snapshot().time_remaining < 15.0);
                }
                Some(TimerEvent::Expired { .. }) => break,
                None => panic!("timer channel closed"),
            }
        }

        let snapshot = h.controller.snapshot();
        assert!(saw_tick);
        assert_eq!(snapshot.answer_state, AnswerState::Incorrect);
        assert_eq!(snapshot.combo, 0);
        assert_eq!(snapshot.history.len(), 1);
        assert!(snapshot.history[0].timed_out);
        assert_eq!(*h.haptics.pulses.lock().unwrap(), vec![Feedback::Incorrect]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_restarts_for_each_question() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::EnToNative));

        for expected_question in 0..2 {
            let expired = loop {
                match h.controller.next_timer_event().await {
                    Some(TimerEvent::Expired { question, .. }) => break question,
                    Some(TimerEvent::Tick { .. }) => {}
                    None => panic!("timer channel closed"),
                }
            };
            assert_eq!(expired, expected_question);
            assert_eq!(h.controller.snapshot().time_remaining, 0.0);

            if expected_question == 0 {
                assert_eq!(h.controller.next(), Some(Advance::Next(1)));
                assert_eq!(h.controller.snapshot().time_remaining, 15.0);
            }
        }

        let history = h.controller.snapshot().history;
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|o| o.timed_out && !o.correct));
        assert_eq!(history[1].question_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_cancels_the_deadline() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::EnToNative));

        tokio::time::sleep(Duration::from_secs(3)).await;
        h.controller.pump_timer_events();
        let right = h.expected();
        assert!(h.controller.answer(&right).unwrap().correct);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!h.controller.pump_timer_events());

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.answer_state, AnswerState::Correct);
        assert_eq!(snapshot.history.len(), 1);
        assert!(snapshot.history[0].correct);
        assert_eq!(*h.haptics.pulses.lock().unwrap(), vec![Feedback::Correct]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_is_ignored() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::EnToNative));
        let session_id = h.controller.session().unwrap().id();

        let right = h.expected();
        h.controller.answer(&right);
        assert!(!h.controller.handle_timer_event(TimerEvent::Expired {
            session: session_id,
            question: 0,
        }));

        h.controller.next();
        assert!(!h.controller.handle_timer_event(TimerEvent::Expired {
            session: session_id,
            question: 0,
        }));
        assert!(!h.controller.handle_timer_event(TimerEvent::Expired {
            session: uuid::Uuid::new_v4(),
            question: 1,
        }));
        assert_eq!(h.controller.snapshot().answer_state, AnswerState::Unanswered);
        assert_eq!(h.controller.snapshot().score, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_answer_through_controller() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::NativeToEn));

        let right = h.expected();
        let wrong = h.wrong();
        let first = h.controller.answer(&right).unwrap();
        assert!(h.controller.answer(&wrong).is_none());

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.history, vec![first]);
        assert_eq!(snapshot.score, 11);
        assert_eq!(h.haptics.pulses.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_audio_questions_autoplay() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::AudioToNative));
        assert_eq!(h.audio.played.lock().unwrap().len(), 1);

        let right = h.expected();
        h.controller.answer(&right);
        assert_eq!(h.audio.played.lock().unwrap().len(), 1);
        assert_eq!(h.controller.next(), Some(Advance::Next(1)));

        let played = h.audio.played.lock().unwrap().clone();
        assert_eq!(played.len(), 2);
        let word = &h.controller.session().unwrap().current_question().unwrap().word;
        assert_eq!(played[1], (word.audio_url.clone(), word.word.clone()));

        assert!(h.controller.replay_audio());
        assert_eq!(h.audio.played.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_questions_do_not_autoplay() {
        let mut h = Harness::new(6);
        h.start(QuizMode::Fixed(QuizType::EnToNative));
        assert!(h.audio.played.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finishing_records_missed_words() {
        let mut h = Harness::new(4);
        h.start(QuizMode::Fixed(QuizType::EnToNative));

        let mut missed = Vec::new();
        for i in 0..4 {
            if i % 2 == 0 {
                let wrong = h.wrong();
                missed.push(h.controller.answer(&wrong).unwrap().word_id);
            } else {
                let right = h.expected();
                h.controller.answer(&right);
            }
            h.controller.next();
        }
        assert_eq!(h.controller.phase(), Phase::Finished);
        // Further calls neither advance nor record twice.
        assert_eq!(h.controller.next(), Some(Advance::Finished));

        let words = h.store.words("book").unwrap();
        for word in words {
            if missed.contains(&word.id) {
                assert!(word.wrong);
                assert_eq!(word.wrong_count, 1);
            } else {
                assert!(!word.wrong);
                assert_eq!(word.wrong_count, 0);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spelling_through_controller() {
        let mut h = Harness::new(5);
        h.start(QuizMode::Fixed(QuizType::Spelling));
        let target = h.expected();

        assert!(h.controller.answer(&target).is_none());
        assert!(h.controller.use_hint());
        assert_eq!(h.controller.snapshot().spelling_input, &target[..1]);
        assert!(h.controller.update_input("zz"));
        let outcome = h.controller.submit().unwrap();
        assert!(!outcome.correct);
        assert!(h.controller.snapshot().spelling_error);
        assert!(h.controller.submit().is_none());
        assert_eq!(h.controller.snapshot().history, vec![outcome]);

        h.controller.next();
        let target = h.expected();
        assert!(h.controller.update_input(&target.to_uppercase()));
        assert!(h.controller.submit().unwrap().correct);
        assert!(h.controller.submit().is_none());
        assert_eq!(h.controller.snapshot().history.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_discards_session_and_timer() {
        let mut h = Harness::new(6);
        let mut updates = h.controller.subscribe();
        h.start(QuizMode::Mixed);
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().phase, Phase::Active);

        h.controller.quit();
        assert_eq!(h.controller.phase(), Phase::Selecting);
        assert_eq!(updates.borrow_and_update().phase, Phase::Selecting);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!h.controller.pump_timer_events());
        assert_eq!(h.controller.next(), None);
        assert!(h.controller.answer("anything").is_none());
    }
}

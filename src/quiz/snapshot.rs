use serde::Serialize;
use uuid::Uuid;

use crate::models::{AnswerOutcome, AnswerState, QuizType};

use super::session::{Phase, QuizSession};

/// What observers may see of the active question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub quiz_type: QuizType,
    pub prompt: String,
    pub options: Vec<String>,
    pub audio_url: String,
    /// Revealed only once the question is resolved.
    pub answer: Option<String>,
}

/// Read-only copy of the session state, published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub session_id: Option<Uuid>,
    pub book_id: Option<String>,
    pub question_index: usize,
    pub question_count: usize,
    pub question: Option<QuestionView>,
    pub score: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub time_remaining: f32,
    pub spelling_input: String,
    pub hints_used: u32,
    pub spelling_error: bool,
    pub answer_state: AnswerState,
    pub selected: Option<String>,
    pub history: Vec<AnswerOutcome>,
}

impl SessionSnapshot {
    /// State before any session exists.
    pub fn selecting() -> Self {
        Self {
            phase: Phase::Selecting,
            session_id: None,
            book_id: None,
            question_index: 0,
            question_count: 0,
            question: None,
            score: 0,
            combo: 0,
            best_combo: 0,
            time_remaining: 0.0,
            spelling_input: String::new(),
            hints_used: 0,
            spelling_error: false,
            answer_state: AnswerState::Unanswered,
            selected: None,
            history: Vec::new(),
        }
    }

    pub fn of(session: Option<&QuizSession>) -> Self {
        let Some(session) = session else {
            return Self::selecting();
        };

        let answered = session.answer_state().is_answered();
        let question = session.current_question().map(|q| QuestionView {
            quiz_type: q.quiz_type,
            prompt: q.prompt().to_string(),
            options: q.options.clone(),
            audio_url: q.word.audio_url.clone(),
            answer: answered.then(|| q.expected().to_string()),
        });

        Self {
            phase: session.phase(),
            session_id: Some(session.id()),
            book_id: Some(session.book_id().to_string()),
            question_index: session.current_index(),
            question_count: session.questions().len(),
            question,
            score: session.score(),
            combo: session.combo().count(),
            best_combo: session.combo().best(),
            time_remaining: session.time_remaining(),
            spelling_input: session.spelling().input().to_string(),
            hints_used: session.spelling().hints_used(),
            spelling_error: session.spelling().has_error(),
            answer_state: session.answer_state(),
            selected: session.selected().map(str::to_string),
            history: session.history().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuizMode, WordItem};
    use crate::quiz::session::SessionSettings;

    #[test]
    fn test_answer_hidden_until_resolved() {
        let words = ["a", "b", "c", "d"];
        let options: Vec<String> = words.iter().map(|w| format!("{}-gloss", w)).collect();
        let question = Question {
            quiz_type: QuizType::EnToNative,
            word: WordItem::new(0, "a", "a-gloss"),
            options,
        };
        let mut session = QuizSession::with_questions(
            "letters",
            QuizMode::Fixed(QuizType::EnToNative),
            vec![question],
            SessionSettings::default(),
        );

        let before = SessionSnapshot::of(Some(&session));
        assert_eq!(before.phase, Phase::Active);
        assert_eq!(before.question.as_ref().unwrap().prompt, "a");
        assert_eq!(before.question.as_ref().unwrap().answer, None);
        assert_eq!(before.time_remaining, 15.0);

        session.answer("b-gloss");
        let after = SessionSnapshot::of(Some(&session));
        assert_eq!(after.question.as_ref().unwrap().answer.as_deref(), Some("a-gloss"));
        assert_eq!(after.selected.as_deref(), Some("b-gloss"));
        assert_eq!(after.answer_state, AnswerState::Incorrect);

        let json = serde_json::to_value(&after).unwrap();
        assert_eq!(json["phase"], "Active");
        assert_eq!(json["history"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_no_session_is_selecting() {
        assert_eq!(SessionSnapshot::of(None), SessionSnapshot::selecting());
    }
}

//! Builds the question list of a session from a book's word pool.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Question, QuizMode, QuizType, WordItem};

/// Questions per session when the pool is large enough.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Smallest pool that can fill a four-option question.
pub const MIN_POOL_SIZE: usize = 4;

pub const DISTRACTOR_COUNT: usize = 3;

/// The pool cannot support a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientWords {
    pub available: usize,
}

impl fmt::Display for InsufficientWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough words for a quiz: need at least {}, this book has {}",
            MIN_POOL_SIZE, self.available
        )
    }
}

impl std::error::Error for InsufficientWords {}

/// Sample up to `count` target words and build one question for each.
///
/// Targets are drawn without replacement. Every multiple-choice question
/// gets up to three distractors taken from the rest of the pool; options
/// are pairwise distinct, so words sharing a gloss never produce two
/// identical options.
pub fn generate_questions<R: Rng + ?Sized>(
    pool: &[WordItem],
    mode: QuizMode,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, InsufficientWords> {
    if pool.len() < MIN_POOL_SIZE {
        return Err(InsufficientWords {
            available: pool.len(),
        });
    }

    let targets = rand::seq::index::sample(rng, pool.len(), count.min(pool.len()));

    let mut questions = Vec::with_capacity(targets.len());
    for target in targets.iter() {
        let quiz_type = pick_type(mode, rng);
        questions.push(build_question(pool, target, quiz_type, rng));
    }
    Ok(questions)
}

fn pick_type<R: Rng + ?Sized>(mode: QuizMode, rng: &mut R) -> QuizType {
    match mode {
        QuizMode::Fixed(quiz_type) => quiz_type,
        QuizMode::Mixed => QuizType::ALL[rng.random_range(0..QuizType::ALL.len())],
    }
}

fn build_question<R: Rng + ?Sized>(
    pool: &[WordItem],
    target: usize,
    quiz_type: QuizType,
    rng: &mut R,
) -> Question {
    let word = pool[target].clone();

    if quiz_type == QuizType::Spelling {
        return Question {
            quiz_type,
            word,
            options: Vec::new(),
        };
    }

    let mut others: Vec<&WordItem> = pool
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != target)
        .map(|(_, other)| other)
        .collect();
    others.shuffle(rng);

    let mut options = Vec::with_capacity(DISTRACTOR_COUNT + 1);
    options.push(quiz_type.answer_for(&word).to_string());

    for other in others {
        if options.len() > DISTRACTOR_COUNT {
            break;
        }
        let text = quiz_type.answer_for(other);
        if options.iter().any(|option| option == text) {
            continue;
        }
        options.push(text.to_string());
    }

    options.shuffle(rng);

    Question {
        quiz_type,
        word,
        options,
    }
}

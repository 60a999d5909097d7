use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::WordItem;

/// How a single question asks about its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizType {
    /// Show the headword, pick the gloss.
    EnToNative,
    /// Show the gloss, pick the headword.
    NativeToEn,
    /// Play the pronunciation, pick the gloss.
    AudioToNative,
    /// Show the gloss, type the headword.
    Spelling,
}

impl QuizType {
    pub const ALL: [QuizType; 4] = [
        QuizType::EnToNative,
        QuizType::NativeToEn,
        QuizType::AudioToNative,
        QuizType::Spelling,
    ];

    pub fn is_audio(self) -> bool {
        matches!(self, QuizType::AudioToNative)
    }

    /// The text of `word` that answers a question of this type.
    pub fn answer_for(self, word: &WordItem) -> &str {
        match self {
            QuizType::NativeToEn | QuizType::Spelling => &word.word,
            QuizType::EnToNative | QuizType::AudioToNative => &word.native,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuizType::EnToNative => "Word → meaning",
            QuizType::NativeToEn => "Meaning → word",
            QuizType::AudioToNative => "Listen → meaning",
            QuizType::Spelling => "Spelling",
        }
    }
}

/// The mode picked before a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizMode {
    Fixed(QuizType),
    /// A random type for every question.
    Mixed,
}

impl QuizMode {
    pub const ALL: [QuizMode; 5] = [
        QuizMode::Mixed,
        QuizMode::Fixed(QuizType::EnToNative),
        QuizMode::Fixed(QuizType::NativeToEn),
        QuizMode::Fixed(QuizType::AudioToNative),
        QuizMode::Fixed(QuizType::Spelling),
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuizMode::Mixed => "Mixed",
            QuizMode::Fixed(quiz_type) => quiz_type.label(),
        }
    }
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::Mixed
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizMode::Mixed => "mixed",
            QuizMode::Fixed(QuizType::EnToNative) => "en-native",
            QuizMode::Fixed(QuizType::NativeToEn) => "native-en",
            QuizMode::Fixed(QuizType::AudioToNative) => "audio",
            QuizMode::Fixed(QuizType::Spelling) => "spelling",
        };
        f.write_str(name)
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mixed" => Ok(QuizMode::Mixed),
            "en-native" => Ok(QuizMode::Fixed(QuizType::EnToNative)),
            "native-en" => Ok(QuizMode::Fixed(QuizType::NativeToEn)),
            "audio" => Ok(QuizMode::Fixed(QuizType::AudioToNative)),
            "spelling" => Ok(QuizMode::Fixed(QuizType::Spelling)),
            other => Err(format!(
                "unknown quiz mode '{}' (expected mixed, en-native, native-en, audio or spelling)",
                other
            )),
        }
    }
}

/// One generated quiz question. Read-only once the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub quiz_type: QuizType,
    pub word: WordItem,
    /// Shuffled answer options; empty for spelling questions.
    pub options: Vec<String>,
}

impl Question {
    pub fn expected(&self) -> &str {
        self.quiz_type.answer_for(&self.word)
    }

    /// Text shown to the user. Audio questions show nothing.
    pub fn prompt(&self) -> &str {
        match self.quiz_type {
            QuizType::EnToNative => &self.word.word,
            QuizType::NativeToEn | QuizType::Spelling => &self.word.native,
            QuizType::AudioToNative => "",
        }
    }

    pub fn is_spelling(&self) -> bool {
        self.quiz_type == QuizType::Spelling
    }
}

/// Whether the active question has been resolved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerState {
    Unanswered,
    Correct,
    Incorrect,
}

impl AnswerState {
    pub fn is_answered(self) -> bool {
        !matches!(self, AnswerState::Unanswered)
    }
}

/// The recorded result of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub word_id: u32,
    pub correct: bool,
    /// What the user gave; `None` when the countdown ran out.
    pub given: Option<String>,
    pub timed_out: bool,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trips_through_text() {
        for mode in QuizMode::ALL {
            assert_eq!(mode.to_string().parse::<QuizMode>().unwrap(), mode);
        }
        assert!("sideways".parse::<QuizMode>().is_err());
        assert_eq!(" Spelling ".parse::<QuizMode>().unwrap(), QuizMode::Fixed(QuizType::Spelling));
    }

    #[test]
    fn test_expected_and_prompt_follow_type() {
        let word = WordItem::new(1, "apple", "pomme");
        let question = |quiz_type| Question {
            quiz_type,
            word: word.clone(),
            options: Vec::new(),
        };

        assert_eq!(question(QuizType::EnToNative).expected(), "pomme");
        assert_eq!(question(QuizType::EnToNative).prompt(), "apple");
        assert_eq!(question(QuizType::NativeToEn).expected(), "apple");
        assert_eq!(question(QuizType::NativeToEn).prompt(), "pomme");
        assert_eq!(question(QuizType::AudioToNative).expected(), "pomme");
        assert_eq!(question(QuizType::AudioToNative).prompt(), "");
        assert_eq!(question(QuizType::Spelling).expected(), "apple");
    }
}

use serde::{Deserialize, Serialize};

/// A single vocabulary entry of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    pub id: u32,
    /// Headword in the language being learned.
    pub word: String,
    /// Gloss in the learner's native language.
    pub native: String,
    #[serde(default)]
    pub audio_url: String,
    /// Filled from the enclosing book when loaded.
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub learned: bool,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub wrong: bool,
    #[serde(default)]
    pub wrong_count: u32,
}

impl WordItem {
    pub fn new(id: u32, word: &str, native: &str) -> Self {
        Self {
            id,
            word: word.to_string(),
            native: native.to_string(),
            audio_url: String::new(),
            book_id: String::new(),
            learned: false,
            favorite: false,
            wrong: false,
            wrong_count: 0,
        }
    }

    /// Flag the word as missed once more.
    pub fn mark_wrong(&mut self) {
        self.wrong = true;
        self.wrong_count += 1;
    }
}

/// A named word list, stored as one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub words: Vec<WordItem>,
}

impl Book {
    /// Stamp every word with this book's id.
    pub fn normalize(&mut self) {
        for word in &mut self.words {
            word.book_id.clone_from(&self.id);
        }
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            word_count: self.words.len(),
            learned_count: self.words.iter().filter(|w| w.learned).count(),
        }
    }
}

/// Listing entry for the book picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub word_count: usize,
    pub learned_count: usize,
}

//! Word storage.
//!
//! Books live outside the quiz engine; the engine only sees them through
//! [`WordPoolProvider`].

mod loader;
mod memory;

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::models::{BookSummary, WordItem};

pub use loader::{load_book_from_json, JsonBookStore};
pub use memory::MemoryBookStore;

/// Source of word pools, keyed by book id.
pub trait WordPoolProvider: Send + Sync {
    /// All books available, sorted by name.
    fn books(&self) -> Result<Vec<BookSummary>, LoadError>;

    /// Every word of one book.
    fn words(&self, book_id: &str) -> Result<Vec<WordItem>, LoadError>;

    /// Replace the stored words of a book, keeping its name.
    fn save_words(&self, book_id: &str, words: &[WordItem]) -> Result<(), LoadError>;
}

/// Error reading or writing a book.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    UnknownBook(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            LoadError::Parse { path, source } => {
                write!(f, "{} is not a valid book: {}", path.display(), source)
            }
            LoadError::UnknownBook(id) => write!(f, "no book with id '{}'", id),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
            LoadError::UnknownBook(_) => None,
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Book, BookSummary, WordItem};

use super::{LoadError, WordPoolProvider};

const BOOK_EXTENSION: &str = "json";

/// Read a single book file.
pub fn load_book_from_json<P: AsRef<Path>>(path: P) -> Result<Book, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut book: Book = serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    book.normalize();
    Ok(book)
}

/// A directory of `<book id>.json` files.
///
/// The file stem is the book id; an `"id"` inside the file is overridden.
pub struct JsonBookStore {
    dir: PathBuf,
}

impl JsonBookStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Ids are plain file stems and never leave the books directory.
    fn book_path(&self, book_id: &str) -> Result<PathBuf, LoadError> {
        let plain = !book_id.is_empty()
            && book_id != "."
            && !book_id.contains(['/', '\\'])
            && !book_id.contains("..");
        if !plain {
            return Err(LoadError::UnknownBook(book_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", book_id, BOOK_EXTENSION)))
    }

    fn load(&self, book_id: &str) -> Result<Book, LoadError> {
        let path = self.book_path(book_id)?;
        if !path.is_file() {
            return Err(LoadError::UnknownBook(book_id.to_string()));
        }
        let mut book = load_book_from_json(&path)?;
        rekey(&mut book, book_id);
        Ok(book)
    }
}

fn rekey(book: &mut Book, book_id: &str) {
    if book.id != book_id {
        tracing::debug!("Book file {} declares id '{}'", book_id, book.id);
        book.id = book_id.to_string();
        book.normalize();
    }
}

impl WordPoolProvider for JsonBookStore {
    fn books(&self) -> Result<Vec<BookSummary>, LoadError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| LoadError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            let Some(book_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match load_book_from_json(&path) {
                Ok(mut book) => {
                    rekey(&mut book, book_id);
                    summaries.push(book.summary());
                }
                Err(e) => tracing::warn!("Skipping unreadable book: {}", e),
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    fn words(&self, book_id: &str) -> Result<Vec<WordItem>, LoadError> {
        Ok(self.load(book_id)?.words)
    }

    fn save_words(&self, book_id: &str, words: &[WordItem]) -> Result<(), LoadError> {
        let mut book = self.load(book_id)?;
        book.words = words.to_vec();
        book.normalize();

        let path = self.book_path(book_id)?;
        let json = serde_json::to_string_pretty(&book).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;

        // Replace atomically via a sibling temp file.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|source| LoadError::Io { path, source })?;

        tracing::debug!("Saved {} words to book {}", book.words.len(), book_id);
        Ok(())
    }
}

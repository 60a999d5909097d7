use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::models::{Book, BookSummary, WordItem};

use super::{LoadError, WordPoolProvider};

/// Books held in process memory.
#[derive(Default)]
pub struct MemoryBookStore {
    books: Mutex<BTreeMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(self, mut book: Book) -> Self {
        book.normalize();
        self.lock().insert(book.id.clone(), book);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Book>> {
        // A poisoned map still holds consistent books; every write replaces a whole entry.
        self.books.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WordPoolProvider for MemoryBookStore {
    fn books(&self) -> Result<Vec<BookSummary>, LoadError> {
        let mut summaries: Vec<_> = self.lock().values().map(Book::summary).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    fn words(&self, book_id: &str) -> Result<Vec<WordItem>, LoadError> {
        self.lock()
            .get(book_id)
            .map(|book| book.words.clone())
            .ok_or_else(|| LoadError::UnknownBook(book_id.to_string()))
    }

    fn save_words(&self, book_id: &str, words: &[WordItem]) -> Result<(), LoadError> {
        let mut books = self.lock();
        let book = books
            .get_mut(book_id)
            .ok_or_else(|| LoadError::UnknownBook(book_id.to_string()))?;
        book.words = words.to_vec();
        book.normalize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_saves_and_stamps_book_id() {
        let store = MemoryBookStore::new().with_book(Book {
            id: "fruit".to_string(),
            name: "Fruit".to_string(),
            words: vec![WordItem::new(1, "apple", "pomme")],
        });

        let mut words = store.words("fruit").unwrap();
        assert_eq!(words[0].book_id, "fruit");

        words[0].learned = true;
        store.save_words("fruit", &words).unwrap();
        assert_eq!(store.books().unwrap()[0].learned_count, 1);

        assert!(matches!(store.words("veg"), Err(LoadError::UnknownBook(_))));
    }
}

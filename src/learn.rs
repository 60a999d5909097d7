//! Flashcard study loop.
//!
//! Cards the user does not know go to the back of the queue and come
//! around again; known cards are flagged as learned and leave the deck.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::WordItem;

pub struct FlashcardDeck {
    book_id: String,
    words: Vec<WordItem>,
    queue: VecDeque<usize>,
    total: usize,
    revealed: bool,
    known: usize,
    misses: usize,
}

impl FlashcardDeck {
    /// Deck over the unlearned words of a book, or all of them.
    pub fn new(book_id: &str, words: Vec<WordItem>, include_learned: bool) -> Self {
        let queue: VecDeque<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, word)| include_learned || !word.learned)
            .map(|(index, _)| index)
            .collect();
        let total = queue.len();

        Self {
            book_id: book_id.to_string(),
            words,
            queue,
            total,
            revealed: false,
            known: 0,
            misses: 0,
        }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.queue.make_contiguous().shuffle(rng);
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn current(&self) -> Option<&WordItem> {
        self.queue.front().map(|&index| &self.words[index])
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Flip the card to show its gloss.
    pub fn reveal(&mut self) {
        if !self.queue.is_empty() {
            self.revealed = true;
        }
    }

    pub fn mark_known(&mut self) -> bool {
        let Some(index) = self.queue.pop_front() else {
            return false;
        };
        self.words[index].learned = true;
        self.known += 1;
        self.revealed = false;
        true
    }

    /// Count a miss and send the card to the back of the deck.
    pub fn mark_unknown(&mut self) -> bool {
        let Some(index) = self.queue.pop_front() else {
            return false;
        };
        let word = &mut self.words[index];
        word.learned = false;
        word.wrong_count += 1;
        self.queue.push_back(index);
        self.misses += 1;
        self.revealed = false;
        true
    }

    pub fn toggle_favorite(&mut self) -> bool {
        let Some(&index) = self.queue.front() else {
            return false;
        };
        let word = &mut self.words[index];
        word.favorite = !word.favorite;
        word.favorite
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    /// Cards learned so far and cards the deck started with.
    pub fn progress(&self) -> (usize, usize) {
        (self.known, self.total)
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn words(&self) -> &[WordItem] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn words() -> Vec<WordItem> {
        let mut words = vec![
            WordItem::new(1, "apple", "pomme"),
            WordItem::new(2, "pear", "poire"),
            WordItem::new(3, "plum", "prune"),
        ];
        words[1].learned = true;
        words
    }

    #[test]
    fn test_skips_learned_words_unless_asked() {
        assert_eq!(FlashcardDeck::new("fruit", words(), false).progress(), (0, 2));
        assert_eq!(FlashcardDeck::new("fruit", words(), true).progress(), (0, 3));
    }

    #[test]
    fn test_unknown_cards_come_back() {
        let mut deck = FlashcardDeck::new("fruit", words(), false);
        assert_eq!(deck.current().unwrap().word, "apple");

        deck.reveal();
        assert!(deck.is_revealed());
        assert!(deck.mark_unknown());
        assert!(!deck.is_revealed());
        assert_eq!(deck.current().unwrap().word, "plum");

        assert!(deck.mark_known());
        assert_eq!(deck.current().unwrap().word, "apple");
        assert!(deck.mark_known());

        assert!(deck.is_finished());
        assert!(!deck.mark_known());
        assert_eq!(deck.progress(), (2, 2));
        assert_eq!(deck.misses(), 1);

        let words = deck.words();
        assert!(words.iter().all(|w| w.learned));
        assert_eq!(words[0].wrong_count, 1);
        assert_eq!(words[2].wrong_count, 0);
    }

    #[test]
    fn test_favorite_toggles() {
        let mut deck = FlashcardDeck::new("fruit", words(), false);
        assert!(deck.toggle_favorite());
        assert!(!deck.toggle_favorite());
        assert!(!deck.words()[0].favorite);
    }

    #[test]
    fn test_shuffle_keeps_every_card() {
        let mut deck = FlashcardDeck::new("fruit", words(), true);
        deck.shuffle(&mut StdRng::seed_from_u64(9));

        let mut seen = Vec::new();
        while let Some(word) = deck.current() {
            seen.push(word.id);
            deck.mark_known();
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
    }
}

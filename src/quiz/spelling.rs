use serde::Serialize;

/// Typing state for a spelling question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpellingState {
    input: String,
    hints_used: u32,
    error: bool,
}

impl SpellingState {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Set after a wrong submission, cleared by the next edit.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Replace the buffer. Text longer than `target` is rejected.
    pub fn update_input(&mut self, text: &str, target: &str) -> bool {
        if text.chars().count() > target.chars().count() {
            return false;
        }
        self.input = text.to_string();
        self.error = false;
        true
    }

    /// Reveal one more letter of `target`.
    ///
    /// The buffer becomes the correct prefix of the target that is one
    /// character longer than what the user already has right, so typos
    /// past that point are dropped. Returns false when the buffer already
    /// spells the whole word.
    pub fn use_hint(&mut self, target: &str) -> bool {
        let target_len = target.chars().count();
        let matched = self
            .input
            .chars()
            .zip(target.chars())
            .take_while(|(typed, expected)| chars_match(*typed, *expected))
            .count();

        if matched == target_len && self.input.chars().count() == target_len {
            return false;
        }

        self.input = target.chars().take(matched + 1).collect();
        self.hints_used += 1;
        self.error = false;
        true
    }

    /// Compare the trimmed buffer with `target`, ignoring case.
    pub fn check(&self, target: &str) -> bool {
        self.input.trim().to_lowercase() == target.trim().to_lowercase()
    }

    pub fn mark_error(&mut self) {
        self.error = true;
    }
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_bounded_by_target_length() {
        let mut spelling = SpellingState::default();
        assert!(spelling.update_input("appl", "apple"));
        assert!(!spelling.update_input("apples", "apple"));
        assert_eq!(spelling.input(), "appl");
    }

    #[test]
    fn test_hints_reveal_prefix() {
        let mut spelling = SpellingState::default();
        assert!(spelling.use_hint("apple"));
        assert!(spelling.use_hint("apple"));
        assert_eq!(spelling.input(), "ap");
        assert_eq!(spelling.hints_used(), 2);
    }

    #[test]
    fn test_hint_replaces_typo_and_stops_when_complete() {
        let mut spelling = SpellingState::default();
        spelling.update_input("axx", "apple");
        spelling.use_hint("apple");
        assert_eq!(spelling.input(), "ap");

        spelling.update_input("APPLE", "apple");
        assert!(!spelling.use_hint("apple"));
        assert_eq!(spelling.hints_used(), 1);
    }

    #[test]
    fn test_check_ignores_case() {
        let mut spelling = SpellingState::default();
        spelling.update_input("ApPlE", "apple");
        assert!(spelling.check("apple"));
        spelling.update_input("ice ", "ice cream");
        assert!(!spelling.check("ice cream"));
        spelling.update_input("appl", "apple");
        assert!(!spelling.check("apple"));
    }

    #[test]
    fn test_edit_clears_error() {
        let mut spelling = SpellingState::default();
        spelling.mark_error();
        assert!(spelling.has_error());
        spelling.update_input("a", "apple");
        assert!(!spelling.has_error());
    }
}

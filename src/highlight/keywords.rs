//! Keyword sets shared between painters of the same language.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// A set of words a painter classifies as keywords.
///
/// Clones share storage, so words added at runtime through the registry are
/// seen by every engine of that language.
#[derive(Clone, Debug, Default)]
pub struct KeywordSet {
    words: Arc<RwLock<HashSet<String>>>,
}

impl KeywordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: Arc::new(RwLock::new(words.into_iter().map(Into::into).collect())),
        }
    }

    /// Add a word. Returns `false` if it was already present.
    pub fn insert(&self, word: impl Into<String>) -> bool {
        self.words
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word.into())
    }

    pub fn remove(&self, word: &str) -> bool {
        self.words
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(word)
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the words.
    #[must_use]
    pub fn words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .words
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        words.sort_unstable();
        words
    }

    /// Whether two handles share storage.
    #[must_use]
    pub fn same_set(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.words, &other.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_words() {
        let set = KeywordSet::from_words(["if", "else"]);
        let alias = set.clone();
        assert!(alias.insert("while"));
        assert!(set.contains("while"));
        assert!(set.same_set(&alias));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn insert_reports_duplicates() {
        let set = KeywordSet::new();
        assert!(set.is_empty());
        assert!(set.insert("for"));
        assert!(!set.insert("for"));
        assert!(set.remove("for"));
        assert!(!set.contains("for"));
    }

    #[test]
    fn words_are_sorted() {
        let set = KeywordSet::from_words(["b", "c", "a"]);
        assert_eq!(set.words(), vec!["a", "b", "c"]);
    }
}

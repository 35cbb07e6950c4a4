use std::collections::HashSet;

use crate::model::word::WordEntry;

/// Default cap on how many learned words are sent to a generator as exclusions.
pub const DEFAULT_EXCLUSION_LIMIT: usize = 200;

//
// ─── LEARNED SET ───────────────────────────────────────────────────────────────
//

/// Words the learner has marked as learned, in the order they were learned.
///
/// No two entries share the same `word`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnedSet {
    entries: Vec<WordEntry>,
    index: HashSet<String>,
}

impl LearnedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from persisted entries, keeping the first occurrence of each word.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = WordEntry>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            if entry.word().is_empty() {
                continue;
            }
            set.push(entry);
        }
        set
    }

    /// Append an entry. Returns `false` (and leaves the set untouched) if the word is already present.
    pub fn push(&mut self, entry: WordEntry) -> bool {
        if self.index.contains(entry.word()) {
            return false;
        }
        self.index.insert(entry.word().to_owned());
        self.entries.push(entry);
        true
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(WordEntry::word)
    }

    /// Entries ordered most recently learned first, for listing.
    pub fn newest_first(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter().rev()
    }
}

//
// ─── EXCLUSIONS ────────────────────────────────────────────────────────────────
//

/// Words a generator should avoid, bounded to the most recently learned ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList(Vec<String>);

impl ExclusionList {
    /// Take the `limit` most recently learned words, oldest of those first.
    #[must_use]
    pub fn from_learned(learned: &LearnedSet, limit: usize) -> Self {
        let skip = learned.len().saturating_sub(limit);
        Self(learned.words().skip(skip).map(str::to_owned).collect())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> WordEntry {
        WordEntry::new(word, "", format!("meaning of {word}"), vec![]).unwrap()
    }

    #[test]
    fn push_rejects_duplicate_word() {
        let mut set = LearnedSet::new();
        assert!(set.push(entry("candid")));
        assert!(!set.push(entry("candid")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn words_are_compared_case_sensitively() {
        let mut set = LearnedSet::new();
        set.push(entry("Polish"));
        assert!(set.push(entry("polish")));
        assert!(set.contains("Polish"));
        assert!(!set.contains("POLISH"));
    }

    #[test]
    fn from_entries_keeps_first_occurrence() {
        let first = WordEntry::new("keen", "", "eager", vec![]).unwrap();
        let second = WordEntry::new("keen", "", "sharp", vec![]).unwrap();
        let set = LearnedSet::from_entries([first.clone(), entry("vivid"), second]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.entries()[0], first);
    }

    #[test]
    fn newest_first_reverses_learned_order() {
        let set = LearnedSet::from_entries([entry("a"), entry("b"), entry("c")]);
        let words: Vec<&str> = set.newest_first().map(WordEntry::word).collect();
        assert_eq!(words, ["c", "b", "a"]);
    }

    #[test]
    fn exclusions_drop_oldest_words_past_limit() {
        let set = LearnedSet::from_entries((0..205).map(|i| entry(&format!("w{i}"))));
        let exclusions = ExclusionList::from_learned(&set, DEFAULT_EXCLUSION_LIMIT);

        assert_eq!(exclusions.len(), 200);
        assert_eq!(exclusions.as_slice()[0], "w5");
        assert_eq!(exclusions.as_slice()[199], "w204");
        assert!(!exclusions.as_slice().iter().any(|w| w == "w4"));
    }

    #[test]
    fn exclusions_keep_everything_under_limit() {
        let set = LearnedSet::from_entries([entry("a"), entry("b")]);
        let exclusions = ExclusionList::from_learned(&set, DEFAULT_EXCLUSION_LIMIT);
        assert_eq!(exclusions.as_slice(), ["a", "b"]);
    }
}

use crate::model::word::WordEntry;

/// Words currently offered to the learner and not yet marked learned.
///
/// Never persisted. Duplicate words coming from a generator are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingBatch {
    entries: Vec<WordEntry>,
}

impl WorkingBatch {
    #[must_use]
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
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
    pub fn find(&self, word: &str) -> Option<&WordEntry> {
        self.entries.iter().find(|entry| entry.word() == word)
    }

    /// Remove every entry with the given word, returning the first one removed.
    pub fn take(&mut self, word: &str) -> Option<WordEntry> {
        let position = self.entries.iter().position(|entry| entry.word() == word)?;
        let taken = self.entries.remove(position);
        self.entries.retain(|entry| entry.word() != word);
        Some(taken)
    }
}

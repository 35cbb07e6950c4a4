use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordEntryError {
    #[error("word cannot be empty")]
    EmptyWord,

    #[error("definition cannot be empty")]
    EmptyDefinition,
}

//
// ─── WORD ENTRY ────────────────────────────────────────────────────────────────
//

/// A single vocabulary item: the word, how to say it, what it means, and how it is used.
///
/// Entries are immutable once built. `word` is the identity key inside a learned set
/// and is compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    word: String,
    pronunciation: String,
    definition: String,
    examples: Vec<String>,
}

impl WordEntry {
    /// Creates a validated entry.
    ///
    /// Surrounding whitespace is trimmed from every field; blank examples are dropped.
    ///
    /// # Errors
    ///
    /// Returns `WordEntryError::EmptyWord` or `WordEntryError::EmptyDefinition`
    /// if the required text is blank.
    pub fn new(
        word: impl Into<String>,
        pronunciation: impl Into<String>,
        definition: impl Into<String>,
        examples: Vec<String>,
    ) -> Result<Self, WordEntryError> {
        let word = word.into().trim().to_owned();
        if word.is_empty() {
            return Err(WordEntryError::EmptyWord);
        }
        let definition = definition.into().trim().to_owned();
        if definition.is_empty() {
            return Err(WordEntryError::EmptyDefinition);
        }

        Ok(Self {
            word,
            pronunciation: pronunciation.into().trim().to_owned(),
            definition,
            examples: examples
                .into_iter()
                .map(|example| example.trim().to_owned())
                .filter(|example| !example.is_empty())
                .collect(),
        })
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn pronunciation(&self) -> &str {
        &self.pronunciation
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Loosely-typed entry as emitted by a word generator.
///
/// Every field is optional so a single bad item can be rejected on its own
/// instead of failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordDraft {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub examples: Option<Vec<String>>,
}

impl WordDraft {
    /// Turn the draft into a `WordEntry`.
    ///
    /// # Errors
    ///
    /// Returns `WordEntryError` when `word` or `definition` is missing or blank.
    pub fn validate(self) -> Result<WordEntry, WordEntryError> {
        WordEntry::new(
            self.word.unwrap_or_default(),
            self.pronunciation.unwrap_or_default(),
            self.definition.unwrap_or_default(),
            self.examples.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_fields_and_drops_blank_examples() {
        let entry = WordEntry::new(
            "  resilient ",
            " /rɪˈzɪliənt/ ",
            " able to recover quickly ",
            vec!["She is resilient.".into(), "   ".into()],
        )
        .unwrap();

        assert_eq!(entry.word(), "resilient");
        assert_eq!(entry.pronunciation(), "/rɪˈzɪliənt/");
        assert_eq!(entry.definition(), "able to recover quickly");
        assert_eq!(entry.examples(), ["She is resilient."]);
    }

    #[test]
    fn new_rejects_blank_word() {
        let err = WordEntry::new("  ", "", "meaning", vec![]).unwrap_err();
        assert_eq!(err, WordEntryError::EmptyWord);
    }

    #[test]
    fn draft_without_definition_is_rejected() {
        let draft: WordDraft =
            serde_json::from_str(r#"{"word":"thrive","pronunciation":"/θraɪv/"}"#).unwrap();
        assert_eq!(draft.validate().unwrap_err(), WordEntryError::EmptyDefinition);
    }

    #[test]
    fn serialized_shape_uses_plain_field_names() {
        let entry = WordEntry::new("thrive", "/θraɪv/", "to grow well", vec!["Plants thrive.".into()])
            .unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "word": "thrive",
                "pronunciation": "/θraɪv/",
                "definition": "to grow well",
                "examples": ["Plants thrive."]
            })
        );
    }
}

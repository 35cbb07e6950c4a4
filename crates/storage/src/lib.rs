#![forbid(unsafe_code)]

pub mod learned_words;
pub mod repository;
pub mod sqlite;

pub use learned_words::{LEARNED_WORDS_KEY, LearnedWordStore};
pub use repository::{InMemoryKeyValueStore, KeyValueStore, Storage, StorageError};

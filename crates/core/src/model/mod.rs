mod batch;
mod learned;
mod level;
mod word;

pub use batch::WorkingBatch;
pub use learned::{DEFAULT_EXCLUSION_LIMIT, ExclusionList, LearnedSet};
pub use level::{LevelParseError, ProficiencyLevel};
pub use word::{WordDraft, WordEntry, WordEntryError};

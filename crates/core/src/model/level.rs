use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown proficiency level: {raw}")]
pub struct LevelParseError {
    raw: String,
}

/// CEFR proficiency level the learner is studying at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    /// Lower intermediate.
    B1,
    /// Upper intermediate.
    #[default]
    B2,
}

impl ProficiencyLevel {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ProficiencyLevel::B1 => "B1",
            ProficiencyLevel::B2 => "B2",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProficiencyLevel::B1 => "B1 - Lower Intermediate",
            ProficiencyLevel::B2 => "B2 - Upper Intermediate",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B1" => Ok(ProficiencyLevel::B1),
            "B2" => Ok(ProficiencyLevel::B2),
            _ => Err(LevelParseError { raw: s.to_owned() }),
        }
    }
}

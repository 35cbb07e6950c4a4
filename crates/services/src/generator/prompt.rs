use lingo_core::model::ProficiencyLevel;
use serde_json::{Value, json};

pub(super) fn batch_prompt(level: ProficiencyLevel, count: usize, exclude: &[String]) -> String {
    let mut prompt = format!(
        "Generate {count} useful English vocabulary words for a {label} (CEFR {code}) learner. \
         For each word provide its IPA pronunciation, a clear and simple definition, \
         and two natural example sentences.",
        label = level.label(),
        code = level.code(),
    );
    if !exclude.is_empty() {
        prompt.push_str(" Do not include any of these words: ");
        prompt.push_str(&exclude.join(", "));
        prompt.push('.');
    }
    prompt
}

pub(super) fn batch_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "words": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": { "type": "STRING" },
                        "pronunciation": { "type": "STRING" },
                        "definition": { "type": "STRING" },
                        "examples": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["word", "pronunciation", "definition", "examples"]
                }
            }
        },
        "required": ["words"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_level_and_count() {
        let prompt = batch_prompt(ProficiencyLevel::B1, 10, &[]);
        assert!(prompt.contains("10 useful English vocabulary words"));
        assert!(prompt.contains("CEFR B1"));
        assert!(!prompt.contains("Do not include"));
    }

    #[test]
    fn prompt_lists_exclusions() {
        let prompt = batch_prompt(
            ProficiencyLevel::B2,
            5,
            &["brisk".to_string(), "ample".to_string()],
        );
        assert!(prompt.ends_with("Do not include any of these words: brisk, ample."));
    }

    #[test]
    fn schema_requires_words_array() {
        let schema = batch_schema();
        assert_eq!(schema["required"][0], "words");
        assert_eq!(schema["properties"]["words"]["type"], "ARRAY");
    }
}

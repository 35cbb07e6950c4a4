use std::time::Duration;

use async_trait::async_trait;
use lingo_core::model::{ProficiencyLevel, WordDraft, WordEntry};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::WordBatchFetcher;
use super::config::GeneratorConfig;
use super::prompt::{batch_prompt, batch_schema};
use crate::error::GeneratorError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.8;

/// Word generator backed by the hosted `generateContent` API with a JSON response schema.
#[derive(Clone)]
pub struct GeminiWordGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl GeminiWordGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn generate_json(&self, prompt: String) -> Result<String, GeneratorError> {
        let config = self.config.as_ref().ok_or(GeneratorError::Disabled)?;

        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let payload = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: batch_schema(),
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", config.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeneratorError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(GeneratorError::Api(error.message));
        }

        let text: String = body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl WordBatchFetcher for GeminiWordGenerator {
    #[instrument(skip(self, exclude), fields(level = %level, excluded = exclude.len()))]
    async fn fetch_batch(
        &self,
        level: ProficiencyLevel,
        desired_count: usize,
        exclude: &[String],
    ) -> Result<Vec<WordEntry>, GeneratorError> {
        let text = self
            .generate_json(batch_prompt(level, desired_count, exclude))
            .await?;
        parse_batch(&text)
    }
}

/// Decode a batch payload, dropping individual entries that fail validation.
fn parse_batch(text: &str) -> Result<Vec<WordEntry>, GeneratorError> {
    let payload: BatchPayload =
        serde_json::from_str(text).map_err(|err| GeneratorError::Malformed(err.to_string()))?;

    let mut entries = Vec::with_capacity(payload.words.len());
    for raw in payload.words {
        let draft = match serde_json::from_value::<WordDraft>(raw) {
            Ok(draft) => draft,
            Err(err) => {
                debug!(error = %err, "dropping undecodable word entry");
                continue;
            }
        };
        match draft.validate() {
            Ok(entry) => entries.push(entry),
            Err(err) => debug!(error = %err, "dropping invalid word entry"),
        }
    }
    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct BatchPayload {
    words: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

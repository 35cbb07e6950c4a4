use std::env;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeneratorConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `LINGO_AI_API_KEY`, `LINGO_AI_BASE_URL` and `LINGO_AI_MODEL`.
    ///
    /// Returns `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LINGO_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("LINGO_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("LINGO_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key: api_key.trim().to_owned(),
            model,
        })
    }
}

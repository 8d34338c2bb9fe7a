pub mod chat;

use thiserror::Error;

pub const DEFAULT_CHAT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Groq API key is required")]
    MissingApiKey,
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),
    #[error("Groq request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Groq API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
}

impl LlmConfig {
    /// Blank keys count as missing.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.trim().is_empty())
    }
}

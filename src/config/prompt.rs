use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, clear and concise assistant.";
pub const DEFAULT_GREETING: &str = "Hi! Write me a message 🙂";
pub const DEFAULT_RESET_GREETING: &str = "Ok, starting over. Tell me 🙂";

#[derive(Debug)]
pub enum PromptError {
    EmptyPrompt(&'static str),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyPrompt(key) => write!(f, "Prompt '{}' must not be empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// The fixed texts a conversation is seeded with.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub system: String,
    pub greeting: String,
    pub reset_greeting: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            reset_greeting: DEFAULT_RESET_GREETING.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if self.system.trim().is_empty() {
            return Err(PromptError::EmptyPrompt("system"));
        }
        if self.greeting.trim().is_empty() {
            return Err(PromptError::EmptyPrompt("greeting"));
        }
        if self.reset_greeting.trim().is_empty() {
            return Err(PromptError::EmptyPrompt("reset_greeting"));
        }
        Ok(())
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<PromptConfig, PromptError> {
    let file_content = fs::read_to_string(&path)?;
    let config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    info!("Loaded prompts from {}", path.as_ref().display());
    Ok(config)
}

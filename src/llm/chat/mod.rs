pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;
use super::{ LlmConfig, LlmError };
use self::groq::GroqChatClient;
use crate::models::chat::ChatMessage;

/// First choice text of a completion, if the provider produced any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: Option<String>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = GroqChatClient::from_config(config)?;
    Ok(Arc::new(client))
}

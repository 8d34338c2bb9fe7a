use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;

use crate::models::api::ChatRequest;
use crate::models::chat::ChatMessage;

const CHAT_ROUTE: &str = "/api/chat";

#[derive(Debug, Error)]
pub enum RelayClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
    },
}

/// Anything that can answer a conversation with the assistant's next reply.
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, RelayClientError>;
}

// The relay answers with either `text` or `error`; read both loosely.
#[derive(Deserialize, Default)]
struct RelayReply {
    text: Option<String>,
    error: Option<String>,
}

pub struct HttpRelayClient {
    http: HttpClient,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(relay_url: &str) -> Result<Self, RelayClientError> {
        let http = HttpClient::builder().build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", relay_url.trim_end_matches('/'), CHAT_ROUTE),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, RelayClientError> {
        let payload = ChatRequest { messages: messages.to_vec() };
        debug!("POST {} with {} messages", self.endpoint, payload.messages.len());

        let resp = self.http.post(&self.endpoint).json(&payload).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        let reply = serde_json::from_slice::<RelayReply>(&bytes).unwrap_or_default();

        if !status.is_success() {
            let message = reply.error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| format!("API error ({})", status.as_u16()));
            return Err(RelayClientError::Api { status: status.as_u16(), message });
        }

        Ok(reply.text.unwrap_or_default())
    }
}

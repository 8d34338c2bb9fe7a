use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use serde_json::Value;

use super::{ ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, TEMPERATURE };
use crate::models::chat::ChatMessage;

const COMPLETIONS_ROUTE: &str = "/openai/v1/chat/completions";

pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

// Every level is optional: a missing piece anywhere means "no content".
// Non-string content counts as absent too.
#[derive(Deserialize, Debug, Default)]
struct GroqResponse {
    #[serde(default)]
    choices: Option<Vec<GroqChoice>>,
}

#[derive(Deserialize, Debug)]
struct GroqChoice {
    #[serde(default)]
    message: Option<GroqResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<Value>,
}

impl GroqResponse {
    fn into_first_content(self) -> Option<String> {
        match self.choices?.into_iter().next()?.message?.content? {
            Value::String(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct GroqErrorBody {
    error: GroqErrorDetail,
}

#[derive(Deserialize)]
struct GroqErrorDetail {
    message: String,
}

impl GroqChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, LlmError> {
        let chat_model = model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let api_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
                LlmError::InvalidApiKey(e.to_string())
            )?
        );

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        Self::new(api_key.to_string(), config.completion_model.clone(), config.base_url.clone())
    }

    fn completions_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), COMPLETIONS_ROUTE)
    }
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, LlmError> {
        let url = self.completions_url();
        let req = GroqRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };

        debug!("Sending {} messages to Groq at {}", messages.len(), url);
        let resp = self.http.post(&url).json(&req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json
                ::from_str::<GroqErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                });
            warn!("Groq API returned {}: {}", status, message);
            return Err(LlmError::Api { status: status.as_u16(), message });
        }

        let parsed = resp.json::<GroqResponse>().await?;
        Ok(CompletionResponse { response: parsed.into_first_content() })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

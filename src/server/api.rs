use crate::llm::chat::{ new_client, ChatClient };
use crate::llm::{ LlmConfig, LlmError };
use crate::models::api::{ ChatResponse, ErrorResponse, HealthResponse };
use crate::models::chat::ChatMessage;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde_json::Value;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

pub const EMPTY_RESPONSE: &str = "empty response";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid format. Expected {{ messages: [...] }}.")]
    InvalidFormat,
    #[error("Invalid messages: {0}")]
    InvalidMessages(String),
    #[error("GROQ_API_KEY is missing")]
    MissingApiKey,
    #[error("{0}")]
    Provider(#[from] LlmError),
}

impl RelayError {
    fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidFormat | RelayError::InvalidMessages(_) => StatusCode::BAD_REQUEST,
            RelayError::MissingApiKey | RelayError::Provider(_) =>
                StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Shared handler state. `chat_client` is `None` when no credential is configured;
/// the relay still serves and answers every chat request with a 500.
#[derive(Clone)]
pub struct AppState {
    chat_client: Option<Arc<dyn ChatClient>>,
}

impl AppState {
    pub fn new(chat_client: Option<Arc<dyn ChatClient>>) -> Self {
        Self { chat_client }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.has_api_key() {
            warn!("No provider credential configured. Chat requests will fail until GROQ_API_KEY is set.");
            return Ok(Self::new(None));
        }
        let client = new_client(config)?;
        info!(
            "Provider client ready: model {} at {}",
            client.get_model(),
            client.get_base_url().unwrap_or_default()
        );
        Ok(Self::new(Some(client)))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

pub async fn start_http_server(
    addr: SocketAddr,
    state: AppState
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
        e
    })?;
    info!("Relay listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    info!("Relay stopped");
    Ok(())
}

fn panic_response(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("Chat handler panicked");
    let body = ErrorResponse { error: "Internal server error".into() };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes
) -> Result<Json<ChatResponse>, RelayError> {
    let client = state.chat_client.as_ref().ok_or(RelayError::MissingApiKey)?;
    let messages = parse_messages(&body)?;
    info!("Relaying {} messages to {}", messages.len(), client.get_model());

    let completion = client.complete(&messages).await.map_err(|e| {
        warn!("Provider call failed: {}", e);
        RelayError::Provider(e)
    })?;

    let text = completion.response
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| EMPTY_RESPONSE.to_string());
    Ok(Json(ChatResponse { text }))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        credential: state.chat_client.is_some(),
    })
}

fn parse_messages(body: &[u8]) -> Result<Vec<ChatMessage>, RelayError> {
    let mut value: Value = serde_json::from_slice(body).map_err(|_| RelayError::InvalidFormat)?;
    match value.get_mut("messages").map(Value::take) {
        Some(items @ Value::Array(_)) =>
            serde_json::from_value(items).map_err(|e| RelayError::InvalidMessages(e.to_string())),
        _ => Err(RelayError::InvalidFormat),
    }
}

use async_trait::async_trait;
use groq_chat::llm::chat::{ ChatClient, CompletionResponse };
use groq_chat::llm::LlmError;
use groq_chat::models::chat::{ ChatMessage, Role };
use groq_chat::server::api::{ router, AppState };
use groq_chat::transcript::relay::HttpRelayClient;
use groq_chat::transcript::{ SendOutcome, Transcript, ERROR_MARKER };
use std::sync::{ Arc, Mutex };

struct RecordingProvider {
    reply: Option<String>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl ChatClient for RecordingProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(CompletionResponse { response: self.reply.clone() })
    }

    fn get_model(&self) -> String {
        "recording".into()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

async fn spawn_relay(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn plan_request_round_trips_through_relay() {
    let provider = Arc::new(RecordingProvider {
        reply: Some("Step 1...".into()),
        seen: Mutex::new(Vec::new()),
    });
    let url = spawn_relay(AppState::new(Some(provider.clone() as Arc<dyn ChatClient>))).await;
    let relay = HttpRelayClient::new(&url).unwrap();
    let mut transcript = Transcript::default();

    let outcome = transcript.send("Plan a 3-step project", &relay).await;

    assert_eq!(outcome, SendOutcome::Replied);
    assert!(!transcript.is_sending());

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 2);
    assert_eq!(seen[0][0].role, Role::System);
    assert_eq!(seen[0][1], ChatMessage::user("Plan a 3-step project"));

    let last = transcript.messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, "Step 1...");
}

#[tokio::test]
async fn missing_credential_shows_inline_error() {
    let url = spawn_relay(AppState::new(None)).await;
    let relay = HttpRelayClient::new(&url).unwrap();
    let mut transcript = Transcript::default();

    let outcome = transcript.send("hi", &relay).await;

    assert_eq!(outcome, SendOutcome::Failed);
    assert!(!transcript.is_sending());
    let last = transcript.messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, format!("{}GROQ_API_KEY is missing", ERROR_MARKER));
}

#[tokio::test]
async fn empty_provider_reply_reaches_client_as_relay_placeholder() {
    let provider = Arc::new(RecordingProvider { reply: None, seen: Mutex::new(Vec::new()) });
    let url = spawn_relay(AppState::new(Some(provider as Arc<dyn ChatClient>))).await;
    let relay = HttpRelayClient::new(&url).unwrap();
    let mut transcript = Transcript::default();

    transcript.send("hi", &relay).await;

    assert_eq!(transcript.messages().last().unwrap().content, "empty response");
}

#[tokio::test]
async fn unreachable_relay_shows_inline_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = HttpRelayClient::new(&format!("http://{}", addr)).unwrap();
    let mut transcript = Transcript::default();

    assert_eq!(transcript.send("hi", &relay).await, SendOutcome::Failed);
    assert!(transcript.messages().last().unwrap().content.starts_with(ERROR_MARKER));
    assert!(!transcript.is_sending());
}

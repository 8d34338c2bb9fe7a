//! Client-side conversation state.
//!
//! A [`Transcript`] owns one session's conversation and the in-flight flag that
//! keeps it to a single outstanding relay call. The conversation only ever grows,
//! except for [`Transcript::reset`], which swaps in a fresh two-message seed.

pub mod relay;

use log::{ debug, warn };
use thiserror::Error;

use crate::config::prompt::PromptConfig;
use crate::models::chat::{ ChatMessage, Message, Role };
use self::relay::{ RelayClient, RelayClientError };

pub const EMPTY_REPLY: &str = "(empty response)";
pub const ERROR_MARKER: &str = "⚠️ ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("message content must not be empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a request was already in flight. Nothing changed.
    Skipped,
    Replied,
    Failed,
}

pub struct Transcript {
    messages: Vec<Message>,
    sending: bool,
    prompts: PromptConfig,
}

impl Transcript {
    pub fn new(prompts: PromptConfig) -> Self {
        let messages = seed(&prompts, &prompts.greeting);
        Self { messages, sending: false, prompts }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The conversation as shown to the user: everything but system messages.
    pub fn visible(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.visible()
            .filter(|m| m.role == Role::Assistant)
            .last()
            .map(|m| m.content.as_str())
    }

    pub fn append(&mut self, message: Message) -> Result<(), TranscriptError> {
        if message.role == Role::User && message.content.trim().is_empty() {
            return Err(TranscriptError::EmptyMessage);
        }
        self.messages.push(message);
        Ok(())
    }

    /// Starts a send cycle: appends the user message, raises the in-flight flag and
    /// returns the payload for the relay. `None` means the send was dropped.
    pub fn begin_send(&mut self, text: &str) -> Option<Vec<ChatMessage>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.sending {
            debug!("Dropping send while a request is in flight");
            return None;
        }

        self.messages.push(Message::new(Role::User, text));
        self.sending = true;
        Some(self.messages.iter().map(Message::to_wire).collect())
    }

    /// Ends a send cycle with the relay's outcome. Always lowers the in-flight flag.
    pub fn finish_send(&mut self, result: Result<String, RelayClientError>) -> SendOutcome {
        if !self.sending {
            warn!("finish_send called with no request in flight");
            return SendOutcome::Skipped;
        }
        self.sending = false;

        match result {
            Ok(text) => {
                let content = if text.is_empty() { EMPTY_REPLY.to_string() } else { text };
                self.messages.push(Message::new(Role::Assistant, content));
                SendOutcome::Replied
            }
            Err(e) => {
                debug!("Relay call failed: {}", e);
                self.messages.push(Message::new(Role::Assistant, format!("{}{}", ERROR_MARKER, e)));
                SendOutcome::Failed
            }
        }
    }

    pub async fn send<R>(&mut self, text: &str, relay: &R) -> SendOutcome where R: RelayClient + ?Sized {
        let Some(payload) = self.begin_send(text) else {
            return SendOutcome::Skipped;
        };
        let result = relay.chat(&payload).await;
        self.finish_send(result)
    }

    pub fn reset(&mut self) {
        self.messages = seed(&self.prompts, &self.prompts.reset_greeting);
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(PromptConfig::default())
    }
}

fn seed(prompts: &PromptConfig, greeting: &str) -> Vec<Message> {
    vec![Message::new(Role::System, prompts.system.clone()), Message::new(Role::Assistant, greeting)]
}

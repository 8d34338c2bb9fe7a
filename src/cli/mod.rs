use clap::{ Args as ClapArgs, Parser, Subcommand };

use crate::llm::{ LlmConfig, DEFAULT_CHAT_MODEL };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP relay in front of the completion provider.
    Serve(ServeArgs),
    /// Chat in the terminal through a running relay.
    Chat(ChatArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the relay to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// API key for the Groq completion API. Left empty, the relay still starts but every chat request fails.
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Base URL for the provider API (e.g., https://api.groq.com)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, the client falls back to the public endpoint
    pub chat_base_url: Option<String>,
}

impl ServeArgs {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: Some(self.chat_api_key.clone()).filter(|k| !k.trim().is_empty()),
            completion_model: Some(self.chat_model.clone()),
            base_url: self.chat_base_url.clone(),
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of the relay serving /api/chat.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:3000")]
    pub relay_url: String,

    /// Optional JSON file overriding the system prompt and greetings.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,
}

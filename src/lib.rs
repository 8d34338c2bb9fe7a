pub mod cli;
pub mod config;
pub mod console;
pub mod llm;
pub mod models;
pub mod server;
pub mod transcript;

use cli::{ Args, Command, ServeArgs };
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Command::Serve(serve_args) => serve(serve_args).await,
        Command::Chat(chat_args) => console::run_chat(&chat_args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = args.llm_config();

    info!("--- Relay Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", config.base_url.as_deref().unwrap_or(llm::DEFAULT_BASE_URL));
    info!("Temperature: {}", llm::TEMPERATURE);
    info!("Credential Configured: {}", config.has_api_key());
    info!("---------------------------");

    let server = Server::new(&args)?;
    server.run().await
}

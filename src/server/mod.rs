pub mod api;

use crate::cli::ServeArgs;
use crate::llm::LlmConfig;
use self::api::AppState;
use std::error::Error;
use std::net::SocketAddr;

pub struct Server {
    addr: SocketAddr,
    llm_config: LlmConfig,
}

impl Server {
    pub fn new(args: &ServeArgs) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let addr = args.server_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid server address '{}': {}", args.server_addr, e))?;

        Ok(Self {
            addr,
            llm_config: args.llm_config(),
        })
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = AppState::from_config(&self.llm_config)?;
        api::start_http_server(self.addr, state).await
    }
}

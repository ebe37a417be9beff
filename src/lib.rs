pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use config::RelayConfig;
use log::info;
use relay::ChatRelay;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("HTTP Port: {}", args.http_port);
    info!("WebSocket Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model);
    if let Some(fallbacks) = &args.chat_model_fallbacks {
        info!("Model Fallbacks: {}", fallbacks);
    }
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("API Key Set: {}", !args.chat_api_key.is_empty());
    info!("Allowed Origins: {}", args.allowed_origins);
    info!("-------------------------");

    let config = Arc::new(RelayConfig::from_args(&args)?);
    let relay = Arc::new(ChatRelay::new(Arc::clone(&config)));
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, relay, config, args);
    server.run().await?;

    Ok(())
}

pub mod api;
pub mod registry;
pub mod websocket;

use crate::cli::Args;
use crate::config::RelayConfig;
use crate::relay::ChatRelay;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    relay: Arc<ChatRelay>,
    config: Arc<RelayConfig>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, relay: Arc<ChatRelay>, config: Arc<RelayConfig>, args: Args) -> Self {
        Self {
            addr,
            relay,
            config,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.start_http_server(self.args.http_port).await?;

        self.start_ws_server().await?;

        Ok(())
    }

    async fn start_http_server(&self, http_port: u16) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(
            http_port,
            Arc::clone(&self.relay),
            Arc::clone(&self.config),
            &self.args,
        )
        .await
    }

    async fn start_ws_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        websocket::start_ws_server(&self.addr, Arc::clone(&self.relay)).await
    }
}

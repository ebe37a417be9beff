use crate::relay::ChatRelay;
use crate::server::registry::ConnectionRegistry;

use std::error::Error;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use lazy_static::lazy_static;

use futures::{SinkExt, StreamExt};
use log::{error, info, warn};

const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;

lazy_static! {
    static ref CONNECTION_LIMITER: RateLimiter<NotKeyed, InMemoryState, DefaultClock> =
        RateLimiter::direct(Quota::per_second(NonZeroU32::new(10).unwrap()));
}

pub async fn start_ws_server(
    addr: &str,
    relay: Arc<ChatRelay>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: {}", addr);

    let registry = ConnectionRegistry::new();

    loop {
        let (stream, peer) = listener.accept().await?;

        if CONNECTION_LIMITER.check().is_err() {
            warn!("Global connection rate limit exceeded for {}. Dropping connection.", peer);
            continue;
        }

        info!("Incoming connection from: {}", peer);
        let relay_clone = Arc::clone(&relay);
        let registry_clone = registry.clone();

        tokio::spawn(async move {
            match accept_async(stream).await {
                Ok(ws) => {
                    handle_connection(peer, ws, relay_clone, registry_clone).await;
                }
                Err(e) => {
                    error!("Handshake failed for {}: {}", peer, e);
                }
            }
        });
    }
}

/// Each inbound text frame is one chat message; the outbound frame is the
/// relay's response text. A relay error closes the channel.
pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    relay: Arc<ChatRelay>,
    registry: ConnectionRegistry,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    info!("New WebSocket connection: {}", peer);

    let (mut tx, mut rx) = websocket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
    let pong_tx = out_tx.clone();
    let handle = registry.register(out_tx).await;
    info!("Assigned channel handle {} to {}", handle, peer);

    // Writer task drains the registered channel into the socket.
    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = rx.next().await {
        match msg {
            Ok(message) => {
                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    break;
                }

                match message {
                    Message::Text(text) => match relay.handle_chat(&text).await {
                        Ok(reply) => {
                            if let Err(e) = registry.send(handle, reply.response).await {
                                error!("Failed to deliver response to {}: {}", peer, e);
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Chat relay error for {}: {}", peer, e);
                            break;
                        }
                    },
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(ping_data) => {
                        if pong_tx.send(Message::Pong(ping_data)).is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                    }
                    Message::Pong(_) => {/* Usually ignore pongs */}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {/* Usually ignore raw frames */}
                }
            }
            Err(e) => {
                info!("WebSocket error for {}: {}", peer, e);
                break;
            }
        }
    }

    registry.unregister(handle).await;
    writer.abort();
    info!("WebSocket connection closed for {} (handle {})", peer, handle);
}

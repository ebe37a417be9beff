use crate::error::RelayError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::protocol::Message;
use uuid::Uuid;

/// Active WebSocket channels. A channel is registered after a successful
/// handshake and unregistered on disconnect or any send failure. Handles are
/// unique while registered; a reconnecting peer gets a fresh handle.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    channels: Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<Message>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn register(&self, sender: mpsc::UnboundedSender<Message>) -> Uuid {
        let handle = Uuid::new_v4();
        self.channels.lock().await.insert(handle, sender);
        handle
    }

    /// Removing an absent handle is a no-op, never an error.
    pub async fn unregister(&self, handle: Uuid) {
        self.channels.lock().await.remove(&handle);
    }

    /// Delivers text to exactly one channel.
    pub async fn send(&self, handle: Uuid, text: String) -> Result<(), RelayError> {
        let sender = {
            let channels = self.channels.lock().await;
            channels.get(&handle).cloned()
        };
        match sender {
            Some(tx) => tx
                .send(Message::Text(text))
                .map_err(|_| RelayError::ChannelClosed(handle.to_string())),
            None => Err(RelayError::ChannelClosed(handle.to_string())),
        }
    }

    pub async fn len(&self) -> usize {
        self.channels.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn register_then_unregister_empties_the_set() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = registry.register(tx).await;
        assert_eq!(registry.len().await, 1);

        registry.unregister(handle).await;
        assert_eq!(registry.len().await, 0);

        // Second removal is a no-op.
        registry.unregister(handle).await;
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn send_delivers_to_exactly_one_channel() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let handle_a = registry.register(tx_a).await;
        let _handle_b = registry.register(tx_b).await;

        registry.send(handle_a, "hello".to_string()).await.unwrap();

        assert_eq!(rx_a.recv().await, Some(Message::Text("hello".to_string())));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_to_unregistered_handle_is_channel_closed() {
        let registry = ConnectionRegistry::new();
        let err = registry
            .send(Uuid::new_v4(), "hello".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::ChannelClosed(_)));
    }

    #[tokio::test]
    async fn send_after_receiver_dropped_is_channel_closed() {
        let registry = ConnectionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = registry.register(tx).await;
        drop(rx);

        let err = registry.send(handle, "hello".to_string()).await.unwrap_err();
        assert!(matches!(err, RelayError::ChannelClosed(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_register_unregister_keeps_set_consistent() {
        let registry = ConnectionRegistry::new();
        let mut tasks = Vec::new();

        for i in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::unbounded_channel();
                let handle = registry.register(tx).await;
                if i % 2 == 0 {
                    registry.unregister(handle).await;
                    None
                } else {
                    Some(handle)
                }
            }));
        }

        let mut kept = HashSet::new();
        for task in tasks {
            if let Some(handle) = task.await.unwrap() {
                assert!(kept.insert(handle), "duplicate handle issued");
            }
        }

        assert_eq!(registry.len().await, kept.len());
        assert_eq!(kept.len(), 16);
    }
}

pub mod gemini;

use crate::error::RelayError;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

/// A single-model completion client. The relay owns one per entry in the
/// model fallback chain; each attempt is independent.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, RelayError>;

    fn model(&self) -> &str;
}

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::llm::chat::gemini::GeminiChatClient;
use crate::llm::chat::{ChatClient, CompletionResponse};
use crate::models::chat::ChatResponse;
use log::{info, warn};
use std::sync::Arc;

/// Forwards one user message to the provider and composes the reply:
/// fixed system instruction in front, at most one official link appended,
/// static source list attached.
pub struct ChatRelay {
    config: Arc<RelayConfig>,
    clients: Vec<Arc<dyn ChatClient>>,
}

impl ChatRelay {
    pub fn new(config: Arc<RelayConfig>) -> Self {
        let clients = match &config.api_key {
            Some(key) => config
                .models
                .iter()
                .map(|model| {
                    Arc::new(GeminiChatClient::new(
                        key.clone(),
                        model.clone(),
                        config.base_url.clone(),
                    )) as Arc<dyn ChatClient>
                })
                .collect(),
            None => Vec::new(),
        };
        Self { config, clients }
    }

    /// Constructor with injected clients, used by tests and alternative providers.
    pub fn with_clients(config: Arc<RelayConfig>, clients: Vec<Arc<dyn ChatClient>>) -> Self {
        Self { config, clients }
    }

    pub async fn handle_chat(&self, message: &str) -> Result<ChatResponse, RelayError> {
        if self.config.api_key.is_none() {
            return Err(RelayError::Configuration("missing credential".to_string()));
        }

        let official_link = self.config.links.lookup(message);
        let prompt = format!("{}\n\nUser: {}", self.config.system_prompt, message);

        let completion = self.complete_with_fallback(&prompt).await?;

        let mut response = completion.response.trim().to_string();
        if let Some(entry) = official_link {
            response.push_str(&entry.decorated());
        }

        Ok(ChatResponse {
            response,
            sources: self.config.sources.clone(),
        })
    }

    /// Tries each configured model in declared order; the first success
    /// short-circuits the rest. Every attempt's error is kept for the
    /// aggregate diagnostic. A malformed success terminates immediately.
    async fn complete_with_fallback(&self, prompt: &str) -> Result<CompletionResponse, RelayError> {
        let mut attempt_errors = Vec::new();

        for client in &self.clients {
            match client.complete(prompt).await {
                Ok(completion) => {
                    info!("Completion succeeded with model: {}", client.model());
                    return Ok(completion);
                }
                Err(RelayError::Provider(e)) => {
                    warn!("Model {} failed: {}", client.model(), e);
                    attempt_errors.push(e);
                }
                Err(other) => return Err(other),
            }
        }

        Err(RelayError::Provider(format!(
            "all models failed: {}",
            attempt_errors.join("; ")
        )))
    }
}

pub mod links;
pub mod prompt;

use crate::cli::Args;
use links::OfficialLinkTable;
use std::error::Error;

/// Immutable relay configuration, built once at process start and shared by
/// reference. Request handling never reads ambient state.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Provider credential. `None` means no generation is possible.
    pub api_key: Option<String>,
    /// Model fallback chain, tried strictly in order. Non-empty by construction.
    pub models: Vec<String>,
    pub base_url: String,
    /// Fixed instruction prepended to every user message.
    pub system_prompt: String,
    pub links: OfficialLinkTable,
    /// Static reference URLs returned with every response.
    pub sources: Vec<String>,
}

impl RelayConfig {
    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let api_key = if args.chat_api_key.is_empty() {
            None
        } else {
            Some(args.chat_api_key.clone())
        };

        let mut models = vec![args.chat_model.clone()];
        if let Some(fallbacks) = &args.chat_model_fallbacks {
            models.extend(
                fallbacks
                    .split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty()),
            );
        }

        let system_prompt = prompt::load_system_prompt(args.system_prompt_path.as_deref())?;
        let links = match &args.links_path {
            Some(path) => OfficialLinkTable::from_file(path)?,
            None => OfficialLinkTable::default(),
        };
        let sources = links.urls();

        Ok(Self {
            api_key,
            models,
            base_url: args.chat_base_url.clone(),
            system_prompt,
            links,
            sources,
        })
    }
}

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// API Key for the generative-language provider. Empty means unset.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Primary model identifier for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-1.5-flash")]
    pub chat_model: String,

    /// Comma-separated fallback model identifiers, tried in order after the primary.
    #[arg(long, env = "CHAT_MODEL_FALLBACKS")]
    pub chat_model_fallbacks: Option<String>,

    /// Base URL for the provider API.
    #[arg(
        long,
        env = "CHAT_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub chat_base_url: String,

    // --- Server Args ---
    /// Port for the HTTP API server to listen on.
    #[arg(long, env = "PORT", default_value = "8000")]
    pub http_port: u16,

    /// Host address and port for the WebSocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8001")]
    pub server_addr: String,

    /// Comma-separated list of allowed CORS origins. "*" allows any origin.
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    pub allowed_origins: String,

    // --- Content Args ---
    /// Optional path to a file overriding the built-in system instruction.
    #[arg(long, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,

    /// Optional path to a JSON file overriding the built-in official link table.
    #[arg(long, env = "LINKS_PATH")]
    pub links_path: Option<String>,

    /// Path to the static frontend page served at "/".
    #[arg(long, env = "FRONTEND_PATH", default_value = "frontend/index.html")]
    pub frontend_path: String,
}

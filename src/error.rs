use thiserror::Error;

/// Relay-level error kinds. Every variant is converted to a uniform
/// user-visible failure at the transport boundary: HTTP 500 with a detail
/// message, or a closed channel for WebSocket clients.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Missing or invalid provider credential. Fatal to the request, not the process.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network, auth, or quota failure from the provider, or every model in
    /// the fallback chain failing.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider call succeeded but the response shape was unexpected.
    #[error("Provider response error: {0}")]
    ProviderResponse(String),

    /// A WebSocket channel was closed before delivery.
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

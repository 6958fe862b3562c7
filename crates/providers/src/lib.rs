//! Provider adapters: the uniform seam between the engine and concrete bot
//! backends.
//!
//! The engine treats every backend identically through [`ProviderAdapter`];
//! backend-specific connection data travels in the bot definition's opaque
//! blob and is interpreted only inside the adapter.

pub mod adapter;
pub mod echo;
pub mod webhook;

pub use {
    adapter::{ProviderAdapter, ProviderReply, ProviderRequest},
    echo::EchoProvider,
    webhook::WebhookProvider,
};

/// Shared HTTP client for provider adapters.
///
/// Adapters that don't need custom redirect/proxy settings should reuse
/// this client to share connection pools, DNS cache, and TLS sessions.
pub fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::LazyLock<reqwest::Client> =
        std::sync::LazyLock::new(reqwest::Client::new);
    &CLIENT
}

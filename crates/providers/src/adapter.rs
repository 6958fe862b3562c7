use {anyhow::Result, async_trait::async_trait, botflow_settings::EffectiveSettings};

/// One turn's worth of input for a backend call.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRequest<'a> {
    pub conversation_id: &'a str,
    /// The coalesced turn text.
    pub content: &'a str,
    /// Backend conversation token from the session (the conversation ID
    /// until the backend's first response replaces it).
    pub session_token: &'a str,
    pub settings: &'a EffectiveSettings,
    /// The bot definition's backend blob, opaque to the engine.
    pub backend: &'a serde_json::Value,
}

/// A backend's answer to one turn.
#[derive(Debug, Clone, Default)]
pub struct ProviderReply {
    /// Raw reply text/markdown. May be empty.
    pub text: String,
    /// Replacement conversation token, when the backend minted one.
    pub session_token: Option<String>,
}

/// Uniform backend interface, implemented once per bot family.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Run one turn against the backend. No retries here; a failure
    /// surfaces to the engine as this turn's error.
    async fn send(&self, request: ProviderRequest<'_>) -> Result<ProviderReply>;
}

//! Generic webhook backend: one JSON POST per turn.

use std::{collections::HashMap, time::Duration};

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::adapter::{ProviderAdapter, ProviderReply, ProviderRequest};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection data carried in the bot definition's backend blob.
#[derive(Debug, Clone, Deserialize)]
struct WebhookBackend {
    url: String,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WebhookTurnRequest<'a> {
    conversation_id: &'a str,
    content: &'a str,
    session_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct WebhookTurnResponse {
    #[serde(default)]
    reply: String,
    #[serde(default)]
    session_token: Option<String>,
}

/// Reference [`ProviderAdapter`]: POSTs the turn as JSON to the URL in the
/// backend blob and reads the reply from the response body.
pub struct WebhookProvider {
    client: reqwest::Client,
}

impl WebhookProvider {
    pub fn new() -> Self {
        Self {
            client: crate::shared_http_client().clone(),
        }
    }

    /// Use a caller-supplied client (custom proxy/TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for WebhookProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for WebhookProvider {
    async fn send(&self, request: ProviderRequest<'_>) -> Result<ProviderReply> {
        let backend: WebhookBackend = serde_json::from_value(request.backend.clone())
            .context("webhook backend blob is missing or malformed")?;

        let timeout = Duration::from_secs(backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let body = WebhookTurnRequest {
            conversation_id: request.conversation_id,
            content: request.content,
            session_token: request.session_token,
        };

        debug!(
            url = %backend.url,
            conversation_id = request.conversation_id,
            "calling webhook backend"
        );

        let mut http = self.client.post(&backend.url).timeout(timeout).json(&body);
        for (name, value) in &backend.headers {
            http = http.header(name, value);
        }

        let response = http
            .send()
            .await
            .with_context(|| format!("webhook request to {} failed", backend.url))?
            .error_for_status()
            .with_context(|| format!("webhook at {} returned an error status", backend.url))?;

        let parsed: WebhookTurnResponse = response
            .json()
            .await
            .context("webhook response is not valid JSON")?;

        Ok(ProviderReply {
            text: parsed.reply,
            session_token: parsed.session_token,
        })
    }
}

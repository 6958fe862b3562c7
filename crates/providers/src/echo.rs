use {anyhow::Result, async_trait::async_trait};

use crate::adapter::{ProviderAdapter, ProviderReply, ProviderRequest};

/// Backend that echoes the turn content back. For tests and wiring checks.
pub struct EchoProvider;

#[async_trait]
impl ProviderAdapter for EchoProvider {
    async fn send(&self, request: ProviderRequest<'_>) -> Result<ProviderReply> {
        Ok(ProviderReply {
            text: format!("Echo: {}", request.content),
            session_token: None,
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, botflow_settings::EffectiveSettings};

    #[tokio::test]
    async fn echoes_content() {
        let settings = EffectiveSettings::default();
        let backend = serde_json::Value::Null;
        let reply = EchoProvider
            .send(ProviderRequest {
                conversation_id: "conv",
                content: "ping",
                session_token: "conv",
                settings: &settings,
                backend: &backend,
            })
            .await
            .unwrap();
        assert_eq!(reply.text, "Echo: ping");
    }
}

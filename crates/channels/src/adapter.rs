use {anyhow::Result, async_trait::async_trait, serde::{Deserialize, Serialize}};

/// Typing indicator shown to the remote party while a reply is being paced
/// out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Composing,
    Paused,
}

/// Classification of a media URL, derived from its file extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Document,
}

/// Outbound surface of the messaging channel. The engine sends through
/// this; delivery receipts and transport errors stay on the channel side.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<()>;

    async fn send_media(
        &self,
        conversation_id: &str,
        kind: MediaKind,
        url: &str,
        caption: &str,
    ) -> Result<()>;

    /// Update the typing indicator. No-op by default; channels without
    /// presence simply skip it.
    async fn set_presence(&self, _conversation_id: &str, _presence: Presence) -> Result<()> {
        Ok(())
    }
}

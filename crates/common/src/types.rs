use serde::{Deserialize, Serialize};

/// Whether a conversation is a direct chat or a group.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    #[default]
    Direct,
    Group,
}

/// One inbound message as handed over by the channel adapter's event
/// pipeline. This is the engine's sole input record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Owning channel instance (one connected account).
    pub instance_id: String,
    /// Conversation the message belongs to (chat/peer ID).
    pub conversation_id: String,
    #[serde(default)]
    pub chat_kind: ChatKind,
    /// Extracted text body. Empty when the channel could not extract text.
    pub body: String,
    /// True when the message was authored by the conversation owner
    /// (the connected account itself).
    #[serde(default)]
    pub from_me: bool,
    pub sender_name: Option<String>,
    /// Channel-native message ID, when the transport provides one.
    pub message_id: Option<String>,
}

impl InboundMessage {
    /// True when no usable text could be extracted from the message.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

use {
    botflow_common::time::{elapsed_ms, now_ms},
    serde::{Deserialize, Serialize},
};

/// Identifies one session: a conversation talking to one bot family on one
/// instance. Sessions of different families never interact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub instance_id: String,
    pub conversation_id: String,
    pub family: String,
}

impl SessionKey {
    pub fn new(
        instance_id: impl Into<String>,
        conversation_id: impl Into<String>,
        family: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            conversation_id: conversation_id.into(),
            family: family.into(),
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.instance_id, self.family, self.conversation_id
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Opened,
    Paused,
    Closed,
}

/// Durable state of an ongoing conversation with one bound bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    pub status: SessionStatus,
    /// False while a turn is in flight for this conversation. The engine
    /// rejects new turns until it flips back to true.
    pub awaiting_user: bool,
    /// The bot this conversation is bound to.
    pub bot_id: String,
    /// Opaque conversation token returned by the backend. Starts out as the
    /// conversation ID until the first backend response replaces it.
    pub backend_token: String,
    pub updated_at_ms: u64,
}

impl Session {
    /// Fresh `Opened` session bound to `bot_id`, not yet awaiting the user
    /// (the creating turn immediately goes in flight).
    pub fn open(key: SessionKey, bot_id: impl Into<String>) -> Self {
        let backend_token = key.conversation_id.clone();
        Self {
            key,
            status: SessionStatus::Opened,
            awaiting_user: false,
            bot_id: bot_id.into(),
            backend_token,
            updated_at_ms: now_ms(),
        }
    }

    /// Whether the session has been inactive beyond `expire_minutes`.
    /// `0` disables expiry.
    pub fn is_expired(&self, expire_minutes: u32, at_ms: u64) -> bool {
        if expire_minutes == 0 {
            return false;
        }
        elapsed_ms(self.updated_at_ms, at_ms) > u64::from(expire_minutes) * 60_000
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::open(SessionKey::new("inst", "conv", "webhook"), "bot")
    }

    #[test]
    fn open_initializes_token_to_conversation_id() {
        let s = session();
        assert_eq!(s.backend_token, "conv");
        assert_eq!(s.status, SessionStatus::Opened);
        assert!(!s.awaiting_user);
    }

    #[test]
    fn zero_expire_minutes_never_expires() {
        let s = session();
        assert!(!s.is_expired(0, s.updated_at_ms + 1_000_000_000));
    }

    #[test]
    fn expiry_boundary() {
        let s = session();
        let minute_ms = 60_000;
        assert!(!s.is_expired(5, s.updated_at_ms + 5 * minute_ms));
        assert!(s.is_expired(5, s.updated_at_ms + 5 * minute_ms + 1));
    }
}

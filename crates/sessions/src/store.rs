use std::{collections::HashMap, sync::Mutex};

use {anyhow::Result, async_trait::async_trait};

use crate::session::{Session, SessionKey};

/// CRUD over session records. Implementations must give read-your-writes
/// consistency within a single turn; the engine provides the per-key
/// serialization on top.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &SessionKey) -> Result<Option<Session>>;

    /// Insert or replace the session stored under its key.
    async fn put(&self, session: &Session) -> Result<()>;

    /// Remove the session. Removing a missing key is a no-op.
    async fn delete(&self, key: &SessionKey) -> Result<()>;
}

/// In-memory store backed by `HashMap`. No persistence — for tests only.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<Session>> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        Ok(sessions.get(key).cloned())
    }

    async fn put(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session.key.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, key: &SessionKey) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(key);
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::session::SessionStatus};

    fn key() -> SessionKey {
        SessionKey::new("inst", "conv", "webhook")
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let store = InMemorySessionStore::new();
        let session = Session::open(key(), "bot");
        store.put(&session).await.unwrap();

        let loaded = store.get(&key()).await.unwrap().unwrap();
        assert_eq!(loaded.bot_id, "bot");
        assert_eq!(loaded.status, SessionStatus::Opened);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemorySessionStore::new();
        let mut session = Session::open(key(), "bot");
        store.put(&session).await.unwrap();

        session.status = SessionStatus::Closed;
        store.put(&session).await.unwrap();

        let loaded = store.get(&key()).await.unwrap().unwrap();
        assert_eq!(loaded.status, SessionStatus::Closed);
    }

    #[tokio::test]
    async fn delete_missing_is_noop() {
        let store = InMemorySessionStore::new();
        store.delete(&key()).await.unwrap();
        assert!(store.get(&key()).await.unwrap().is_none());
    }
}

use std::{collections::HashMap, sync::Mutex};

use {anyhow::Result, async_trait::async_trait};

use crate::schema::DefaultSettings;

/// Source of instance-wide default settings. The durable backing store is
/// owned by an external repository; the engine only reads through this seam.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Default settings for an instance. Unknown instances get built-ins.
    async fn defaults(&self, instance_id: &str) -> Result<DefaultSettings>;

    /// Replace an instance's default settings.
    async fn set_defaults(&self, instance_id: &str, settings: DefaultSettings) -> Result<()>;
}

/// In-memory store backed by `HashMap`. No persistence — for tests only.
pub struct InMemorySettingsStore {
    defaults: Mutex<HashMap<String, DefaultSettings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self {
            defaults: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn defaults(&self, instance_id: &str) -> Result<DefaultSettings> {
        let defaults = self.defaults.lock().unwrap_or_else(|e| e.into_inner());
        Ok(defaults.get(instance_id).cloned().unwrap_or_default())
    }

    async fn set_defaults(&self, instance_id: &str, settings: DefaultSettings) -> Result<()> {
        let mut defaults = self.defaults.lock().unwrap_or_else(|e| e.into_inner());
        defaults.insert(instance_id.to_string(), settings);
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_instance_gets_built_ins() {
        let store = InMemorySettingsStore::new();
        let defaults = store.defaults("nope").await.unwrap();
        assert_eq!(defaults.debounce_seconds, 0);
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = InMemorySettingsStore::new();
        let settings = DefaultSettings {
            expire_minutes: 42,
            ..Default::default()
        };
        store.set_defaults("inst", settings).await.unwrap();
        assert_eq!(store.defaults("inst").await.unwrap().expire_minutes, 42);
    }
}

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    definition::{BotDefinition, Trigger},
    error::{Error, Result},
};

/// CRUD over bot definitions. The durable backing store is owned by an
/// external repository; implementations must uphold the validation rules
/// enforced here by rejecting invalid saves.
#[async_trait]
pub trait BotStore: Send + Sync {
    /// All definitions for one instance and family.
    async fn list(&self, instance_id: &str, family: &str) -> Result<Vec<BotDefinition>>;

    async fn get(&self, id: &str) -> Result<Option<BotDefinition>>;

    /// Insert or update a definition. Rejects definitions that fail
    /// [`BotDefinition::validate`] or that would create a second enabled
    /// catch-all bot for the same instance and family.
    async fn save(&self, bot: &BotDefinition) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory store backed by `HashMap`. No persistence — for tests only.
pub struct InMemoryBotStore {
    bots: Mutex<HashMap<String, BotDefinition>>,
}

impl InMemoryBotStore {
    pub fn new() -> Self {
        Self {
            bots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BotStore for InMemoryBotStore {
    async fn list(&self, instance_id: &str, family: &str) -> Result<Vec<BotDefinition>> {
        let bots = self.bots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(bots
            .values()
            .filter(|b| b.instance_id == instance_id && b.family == family)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<BotDefinition>> {
        let bots = self.bots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(bots.get(id).cloned())
    }

    async fn save(&self, bot: &BotDefinition) -> Result<()> {
        bot.validate()?;
        let mut bots = self.bots.lock().unwrap_or_else(|e| e.into_inner());
        if bot.enabled && bot.trigger == Trigger::All {
            let duplicate = bots.values().any(|other| {
                other.id != bot.id
                    && other.instance_id == bot.instance_id
                    && other.family == bot.family
                    && other.enabled
                    && other.trigger == Trigger::All
            });
            if duplicate {
                return Err(Error::DuplicateCatchAll {
                    instance_id: bot.instance_id.clone(),
                    family: bot.family.clone(),
                });
            }
        }
        bots.insert(bot.id.clone(), bot.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut bots = self.bots.lock().unwrap_or_else(|e| e.into_inner());
        if bots.remove(id).is_none() {
            return Err(Error::UnknownBot { bot_id: id.into() });
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::definition::{Trigger, TriggerOperator},
    };

    #[tokio::test]
    async fn save_list_roundtrip() {
        let store = InMemoryBotStore::new();
        let bot = BotDefinition::new("inst", "webhook", Trigger::All);
        store.save(&bot).await.unwrap();

        let bots = store.list("inst", "webhook").await.unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, bot.id);
        assert!(store.list("inst", "other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_catch_all_rejected() {
        let store = InMemoryBotStore::new();
        store
            .save(&BotDefinition::new("inst", "webhook", Trigger::All))
            .await
            .unwrap();

        let second = BotDefinition::new("inst", "webhook", Trigger::All);
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateCatchAll { .. }));
    }

    #[tokio::test]
    async fn catch_all_allowed_across_families_and_instances() {
        let store = InMemoryBotStore::new();
        store
            .save(&BotDefinition::new("inst", "webhook", Trigger::All))
            .await
            .unwrap();
        store
            .save(&BotDefinition::new("inst", "dify", Trigger::All))
            .await
            .unwrap();
        store
            .save(&BotDefinition::new("other", "webhook", Trigger::All))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn disabled_catch_all_does_not_block() {
        let store = InMemoryBotStore::new();
        let mut first = BotDefinition::new("inst", "webhook", Trigger::All);
        first.enabled = false;
        store.save(&first).await.unwrap();
        store
            .save(&BotDefinition::new("inst", "webhook", Trigger::All))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn updating_the_same_catch_all_is_fine() {
        let store = InMemoryBotStore::new();
        let mut bot = BotDefinition::new("inst", "webhook", Trigger::All);
        store.save(&bot).await.unwrap();
        bot.overrides.debounce_seconds = Some(3);
        store.save(&bot).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_definitions_rejected() {
        let store = InMemoryBotStore::new();
        let bot = BotDefinition::new(
            "inst",
            "webhook",
            Trigger::Keyword {
                operator: TriggerOperator::Equals,
                value: String::new(),
            },
        );
        assert!(store.save(&bot).await.is_err());
    }

    #[tokio::test]
    async fn delete_unknown_errors() {
        let store = InMemoryBotStore::new();
        assert!(matches!(
            store.delete("nope").await.unwrap_err(),
            Error::UnknownBot { .. }
        ));
    }
}

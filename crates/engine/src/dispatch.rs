use std::{sync::Arc, time::Duration};

use {
    dashmap::DashMap,
    tracing::{debug, warn},
};

use {
    botflow_bots::{BotStore, match_bot},
    botflow_channels::ChannelAdapter,
    botflow_common::InboundMessage,
    botflow_debounce::Coalescer,
    botflow_delivery::Deliverer,
    botflow_providers::ProviderAdapter,
    botflow_sessions::{SessionKey, SessionStatus, SessionStore},
    botflow_settings::{SettingsStore, is_ignored, resolve},
};

use crate::turn::TurnContext;

/// One registered bot family: a named backend integration with its own
/// bots, sessions, and debounce buffers.
struct Family {
    name: String,
    provider: Arc<dyn ProviderAdapter>,
    coalescer: Arc<Coalescer>,
}

/// Map of per-session turn locks. Transitions on a session record happen
/// under its lock; the lock is never held across a backend call.
pub(crate) type TurnLocks = Arc<DashMap<SessionKey, Arc<tokio::sync::Mutex<()>>>>;

pub(crate) fn lock_for(locks: &TurnLocks, key: &SessionKey) -> Arc<tokio::sync::Mutex<()>> {
    locks
        .entry(key.clone())
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

/// The dispatch engine. All collaborators are injected; the engine holds
/// no global state.
pub struct Engine {
    bots: Arc<dyn BotStore>,
    sessions: Arc<dyn SessionStore>,
    settings: Arc<dyn SettingsStore>,
    channel: Arc<dyn ChannelAdapter>,
    deliverer: Arc<Deliverer>,
    families: Vec<Family>,
    turn_locks: TurnLocks,
}

impl Engine {
    pub fn new(
        bots: Arc<dyn BotStore>,
        sessions: Arc<dyn SessionStore>,
        settings: Arc<dyn SettingsStore>,
        channel: Arc<dyn ChannelAdapter>,
    ) -> Self {
        let deliverer = Arc::new(Deliverer::new(Arc::clone(&channel)));
        Self {
            bots,
            sessions,
            settings,
            channel,
            deliverer,
            families: Vec::new(),
            turn_locks: Arc::new(DashMap::new()),
        }
    }

    /// Register a bot family backed by `provider`. Each family gets its own
    /// debounce buffers and its own sessions.
    pub fn register_family(&mut self, name: impl Into<String>, provider: Arc<dyn ProviderAdapter>) {
        self.families.push(Family {
            name: name.into(),
            provider,
            coalescer: Arc::new(Coalescer::new()),
        });
    }

    /// Entry point: route one inbound message. Families are dispatched
    /// concurrently and independently; a match in one family never
    /// suppresses another.
    pub async fn dispatch(&self, msg: InboundMessage) {
        futures::future::join_all(
            self.families
                .iter()
                .map(|family| self.dispatch_family(family, &msg)),
        )
        .await;
    }

    async fn dispatch_family(&self, family: &Family, msg: &InboundMessage) {
        if let Err(e) = self.try_dispatch_family(family, msg).await {
            warn!(
                family = %family.name,
                instance_id = %msg.instance_id,
                conversation_id = %msg.conversation_id,
                error = %e,
                "dispatch failed"
            );
        }
    }

    async fn try_dispatch_family(&self, family: &Family, msg: &InboundMessage) -> anyhow::Result<()> {
        let defaults = self.settings.defaults(&msg.instance_id).await?;
        let bots = self.bots.list(&msg.instance_id, &family.name).await?;
        let key = SessionKey::new(&msg.instance_id, &msg.conversation_id, &family.name);
        let session = self.sessions.get(&key).await?;

        // A live session keeps the conversation bound to its bot; triggers
        // are only evaluated for new conversations.
        let bound = session
            .as_ref()
            .filter(|s| s.status != SessionStatus::Closed)
            .map(|s| s.bot_id.as_str());

        let Some(bot) = match_bot(&msg.body, &bots, bound, defaults.fallback_bot_id.as_deref())
        else {
            debug!(
                family = %family.name,
                conversation_id = %msg.conversation_id,
                "no bot claimed the message"
            );
            return Ok(());
        };

        let settings = resolve(&defaults, &bot.overrides);

        if is_ignored(&msg.conversation_id, msg.chat_kind, &settings.ignored) {
            debug!(
                family = %family.name,
                conversation_id = %msg.conversation_id,
                "conversation is on the ignore list"
            );
            return Ok(());
        }

        // Owner-authored messages are resolved before coalescing so they
        // never pollute the debounce buffer.
        if msg.from_me {
            if settings.stop_bot_from_me {
                return self.pause_session(&key).await;
            }
            if !settings.listening_from_me {
                debug!(
                    family = %family.name,
                    conversation_id = %msg.conversation_id,
                    "owner message ignored"
                );
                return Ok(());
            }
        }

        let ctx = TurnContext {
            sessions: Arc::clone(&self.sessions),
            channel: Arc::clone(&self.channel),
            deliverer: Arc::clone(&self.deliverer),
            provider: Arc::clone(&family.provider),
            locks: Arc::clone(&self.turn_locks),
            key,
            bot: bot.clone(),
            settings: settings.clone(),
        };
        let window = Duration::from_secs(settings.debounce_seconds);
        family
            .coalescer
            .push(&msg.conversation_id, &msg.body, window, move |content| {
                Box::pin(async move { ctx.run(content).await })
            })
            .await;
        Ok(())
    }

    /// Human takeover: an owner-authored message pauses the live session.
    async fn pause_session(&self, key: &SessionKey) -> anyhow::Result<()> {
        let lock = lock_for(&self.turn_locks, key);
        let _guard = lock.lock().await;

        let Some(mut session) = self.sessions.get(key).await? else {
            return Ok(());
        };
        if session.status == SessionStatus::Closed {
            return Ok(());
        }
        session.status = SessionStatus::Paused;
        session.updated_at_ms = botflow_common::time::now_ms();
        self.sessions.put(&session).await?;
        debug!(session = %key, "session paused by owner message");
        Ok(())
    }
}

//! One coalesced turn through the session state machine.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use {
    botflow_bots::BotDefinition,
    botflow_channels::ChannelAdapter,
    botflow_common::time::now_ms,
    botflow_delivery::Deliverer,
    botflow_providers::{ProviderAdapter, ProviderRequest},
    botflow_sessions::{Session, SessionKey, SessionStatus, SessionStore},
    botflow_settings::EffectiveSettings,
};

use crate::dispatch::{TurnLocks, lock_for};

/// Everything one coalesced turn needs, captured at dispatch time.
pub(crate) struct TurnContext {
    pub sessions: Arc<dyn SessionStore>,
    pub channel: Arc<dyn ChannelAdapter>,
    pub deliverer: Arc<Deliverer>,
    pub provider: Arc<dyn ProviderAdapter>,
    pub locks: TurnLocks,
    pub key: SessionKey,
    pub bot: BotDefinition,
    pub settings: EffectiveSettings,
}

impl TurnContext {
    pub(crate) async fn run(self, content: String) {
        if let Err(e) = self.run_inner(&content).await {
            warn!(session = %self.key, error = %e, "turn failed");
        }
    }

    async fn run_inner(&self, content: &str) -> anyhow::Result<()> {
        let lock = lock_for(&self.locks, &self.key);

        // Phase 1: state transition under the turn lock.
        let session = {
            let _guard = lock.lock().await;
            match self.begin_turn(content).await? {
                Some(session) => session,
                None => return Ok(()),
            }
        };

        // Phase 2: the backend call runs without the lock; overlapping
        // turns are kept out by the awaiting_user gate, not by blocking.
        let request = ProviderRequest {
            conversation_id: &self.key.conversation_id,
            content,
            session_token: &session.backend_token,
            settings: &self.settings,
            backend: &self.bot.backend,
        };

        match self.provider.send(request).await {
            Ok(reply) => {
                let delivered = self
                    .deliverer
                    .deliver(&self.key.conversation_id, &reply.text, &self.settings)
                    .await;

                let _guard = lock.lock().await;
                // The session may have been paused or replaced while the
                // call was in flight; the response applies to whatever
                // state exists now.
                let mut current = self.sessions.get(&self.key).await?.unwrap_or(session);
                current.awaiting_user = true;
                current.updated_at_ms = now_ms();
                if let Some(token) = reply.session_token {
                    current.backend_token = token;
                }
                self.sessions.put(&current).await?;
                delivered
            },
            Err(e) => {
                error!(session = %self.key, error = %e, "backend call failed");
                if let Some(text) = &self.settings.unknown_message {
                    if let Err(send_err) = self
                        .channel
                        .send_text(&self.key.conversation_id, text)
                        .await
                    {
                        warn!(session = %self.key, error = %send_err, "unknown-message send failed");
                    }
                }

                // Restore the gate so the conversation cannot wedge.
                let _guard = lock.lock().await;
                if let Some(mut current) = self.sessions.get(&self.key).await? {
                    current.awaiting_user = true;
                    self.sessions.put(&current).await?;
                }
                Ok(())
            },
        }
    }

    /// Apply the pre-call state machine rules. Returns the session to run
    /// the backend call against, or `None` when the turn ends here.
    async fn begin_turn(&self, content: &str) -> anyhow::Result<Option<Session>> {
        let now = now_ms();
        let mut session = self.sessions.get(&self.key).await?;

        // A closed session never advances; it is recreated below. Whether
        // the old record was kept or deleted was settled when it closed.
        if session.as_ref().is_some_and(|s| s.status == SessionStatus::Closed) {
            session = None;
        }

        // Expiry. With keep_open_on_close the record is closed and the turn
        // stops; the next message recreates the session. Without it the
        // record is deleted and this same turn continues against a fresh one.
        if let Some(s) = session.take() {
            if s.is_expired(self.settings.expire_minutes, now) {
                debug!(session = %self.key, "session expired");
                if self.settings.keep_open_on_close {
                    let mut closed = s;
                    closed.status = SessionStatus::Closed;
                    self.sessions.put(&closed).await?;
                    return Ok(None);
                }
                self.sessions.delete(&self.key).await?;
            } else {
                session = Some(s);
            }
        }

        // A paused session belongs to a human; drop the turn.
        if session.as_ref().is_some_and(|s| s.status == SessionStatus::Paused) {
            debug!(session = %self.key, "session paused, turn dropped");
            return Ok(None);
        }

        // The at-most-one-in-flight gate. Rejected turns are not queued;
        // the next inbound message picks the conversation back up.
        if session.as_ref().is_some_and(|s| !s.awaiting_user) {
            warn!(session = %self.key, "turn rejected, a backend call is already in flight");
            return Ok(None);
        }

        if self.is_finish_keyword(content) {
            if let Some(s) = session {
                info!(session = %self.key, "finish keyword received");
                if self.settings.keep_open_on_close {
                    let mut closed = s;
                    closed.status = SessionStatus::Closed;
                    closed.updated_at_ms = now;
                    self.sessions.put(&closed).await?;
                } else {
                    self.sessions.delete(&self.key).await?;
                }
            }
            return Ok(None);
        }

        let mut session = match session {
            Some(s) => s,
            None => {
                info!(session = %self.key, bot_id = %self.bot.id, "session opened");
                Session::open(self.key.clone(), self.bot.id.clone())
            },
        };

        // Unextractable content bypasses the backend entirely. The session
        // still completes the turn so the gate cannot wedge.
        if content.trim().is_empty() {
            if let Some(text) = &self.settings.unknown_message {
                self.channel
                    .send_text(&self.key.conversation_id, text)
                    .await?;
            } else {
                debug!(session = %self.key, "empty content dropped");
            }
            session.awaiting_user = true;
            session.updated_at_ms = now;
            self.sessions.put(&session).await?;
            return Ok(None);
        }

        session.awaiting_user = false;
        self.sessions.put(&session).await?;
        Ok(Some(session))
    }

    fn is_finish_keyword(&self, content: &str) -> bool {
        !self.settings.keyword_finish.is_empty()
            && content
                .trim()
                .eq_ignore_ascii_case(&self.settings.keyword_finish)
    }
}

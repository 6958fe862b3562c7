use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use {
    anyhow::Result,
    botflow_channels::{ChannelAdapter, Presence},
    botflow_settings::EffectiveSettings,
    regex::Regex,
    tracing::debug,
};

use crate::segment::{Segment, segment};

/// Floor for the per-message delay.
pub const MIN_DELAY_MS: u64 = 500;
/// Ceiling for the per-message delay.
pub const MAX_DELAY_MS: u64 = 10_000;

#[allow(clippy::expect_used)]
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("blank line regex is valid"));

/// Sends a segmented reply through the channel, one message at a time,
/// holding a composing indicator for a length-proportional delay before
/// each send.
pub struct Deliverer {
    channel: Arc<dyn ChannelAdapter>,
}

impl Deliverer {
    pub fn new(channel: Arc<dyn ChannelAdapter>) -> Self {
        Self { channel }
    }

    /// Deliver `reply` to the conversation. An empty reply falls back to
    /// the configured unknown-message text, or does nothing.
    pub async fn deliver(
        &self,
        conversation_id: &str,
        reply: &str,
        settings: &EffectiveSettings,
    ) -> Result<()> {
        let reply = if reply.trim().is_empty() {
            match &settings.unknown_message {
                Some(text) => text.clone(),
                None => {
                    debug!(conversation_id, "empty reply and no unknown message configured");
                    return Ok(());
                },
            }
        } else {
            reply.to_string()
        };

        for piece in segment(&reply) {
            match piece {
                Segment::Text(text) => {
                    for message in split_messages(&text, settings.split_messages) {
                        let delay = message_delay(message.len(), settings);
                        self.paced(conversation_id, delay, || {
                            self.channel.send_text(conversation_id, message)
                        })
                        .await?;
                    }
                },
                Segment::Media { kind, url, caption } => {
                    let delay = message_delay(caption.len(), settings);
                    self.paced(conversation_id, delay, || {
                        self.channel.send_media(conversation_id, kind, &url, &caption)
                    })
                    .await?;
                },
            }
        }
        Ok(())
    }

    /// Hold `composing` for the delay, run the send, then show `paused`.
    async fn paced<F, Fut>(&self, conversation_id: &str, delay: Duration, send: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.channel
            .set_presence(conversation_id, Presence::Composing)
            .await?;
        tokio::time::sleep(delay).await;
        send().await?;
        self.channel
            .set_presence(conversation_id, Presence::Paused)
            .await?;
        Ok(())
    }
}

/// Compute the delay for one outgoing message.
pub fn message_delay(length: usize, settings: &EffectiveSettings) -> Duration {
    let ms = if settings.ms_per_character > 0 {
        length as u64 * settings.ms_per_character
    } else {
        settings.reply_delay_ms
    };
    Duration::from_millis(ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS))
}

fn split_messages(text: &str, split: bool) -> Vec<&str> {
    if !split {
        return vec![text];
    }
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

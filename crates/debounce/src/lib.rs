//! Per-conversation fragment coalescing.
//!
//! Bursts of near-simultaneous messages are buffered per conversation and
//! emitted as one newline-joined turn after a quiet period. Buffers are
//! in-memory only; a process restart drops at most one coalesced turn.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use {dashmap::DashMap, tracing::trace};

/// Future returned by a flush callback.
pub type FlushFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

struct Buffer {
    parts: Vec<String>,
    /// Bumped on every push; a timer only flushes if its observed
    /// generation is still current when it fires.
    generation: u64,
}

/// Buffers text fragments per conversation and flushes each buffer exactly
/// once per quiet period. Conversations are fully independent; the
/// coalescer never consults session state.
pub struct Coalescer {
    buffers: Arc<DashMap<String, Buffer>>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self {
            buffers: Arc::new(DashMap::new()),
        }
    }

    /// Add a fragment for `conversation_id`.
    ///
    /// A zero `window` flushes the fragment inline without buffering.
    /// Otherwise the fragment is appended to the conversation's buffer and
    /// the quiet-period timer restarts; when it fires, the buffer is
    /// removed and `flush` runs once with the newline-joined text. Each
    /// push supplies its own `flush`; only the final fragment's callback
    /// is invoked.
    pub async fn push<F>(&self, conversation_id: &str, text: &str, window: Duration, flush: F)
    where
        F: FnOnce(String) -> FlushFuture + Send + 'static,
    {
        if window.is_zero() {
            flush(text.to_string()).await;
            return;
        }

        let generation = {
            let mut buffer = self
                .buffers
                .entry(conversation_id.to_string())
                .or_insert_with(|| Buffer {
                    parts: Vec::new(),
                    generation: 0,
                });
            buffer.parts.push(text.to_string());
            buffer.generation += 1;
            buffer.generation
        };

        trace!(
            conversation_id,
            generation,
            window_ms = window.as_millis() as u64,
            "debounce timer (re)armed"
        );

        let buffers = Arc::clone(&self.buffers);
        let key = conversation_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // A newer fragment re-armed the timer; let its task flush.
            let Some((_, buffer)) = buffers.remove_if(&key, |_, b| b.generation == generation)
            else {
                return;
            };
            flush(buffer.parts.join("\n")).await;
        });
    }
}

impl Default for Coalescer {
    fn default() -> Self {
        Self::new()
    }
}

//! Speech synthesis delegated to the connected browser.

use super::protocol::ServerMessage;
use anyhow::{Context, Result, anyhow};
use assistant_core::speech::SpeechSynthesizer;
use async_trait::async_trait;
use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

type Pending = Option<(u64, oneshot::Sender<()>)>;

/// Plays text by sending `speak_text` and waiting for the client's `playback_ended`.
///
/// Every request carries a fresh id. Only a `playback_ended` echoing the id of
/// the playback in flight resolves it; replies for cancelled requests are dropped.
pub struct ClientSynthesizer {
    outbound: mpsc::Sender<ServerMessage>,
    next_id: AtomicU64,
    pending: Mutex<Pending>,
}

impl ClientSynthesizer {
    pub fn new(outbound: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            outbound,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(None),
        }
    }

    /// Resolves playback `id`. Returns `false` if it is not the one in flight.
    pub fn finish(&self, id: u64) -> bool {
        let mut pending = self.lock_pending();
        match pending.take() {
            Some((current, done)) if current == id => done.send(()).is_ok(),
            other => {
                debug!(id, in_flight = ?other.as_ref().map(|(current, _)| *current), "Ignoring stale playback_ended");
                *pending = other;
                false
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Pending> {
        match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ClientSynthesizer {
    async fn play(&self, text: &str) -> Result<()> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (done_tx, done_rx) = oneshot::channel();
        *self.lock_pending() = Some((id, done_tx));
        self.outbound
            .send(ServerMessage::SpeakText {
                id,
                text: text.to_string(),
            })
            .await
            .context("Session writer is gone")?;
        done_rx
            .await
            .map_err(|_| anyhow!("Playback {id} was abandoned before the client finished"))
    }

    async fn halt(&self) {
        let id = self.lock_pending().take().map(|(id, _)| id);
        if let Err(e) = self.outbound.send(ServerMessage::CancelSpeech { id }).await {
            warn!(error = %e, "Failed to send cancel_speech to client");
        }
    }
}

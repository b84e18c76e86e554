//! Speech input and output state machines.
//!
//! Both sides of the voice pipeline are modeled as explicit `Idle -> Active -> Idle`
//! machines driven by the assistant's single event loop:
//!
//! - [`SpeechInput`] tracks whether the recognizer is listening and filters
//!   recognition results down to finalized [`Utterance`]s.
//! - [`SpeechOutput`] owns at most one in-flight playback. A new request cancels
//!   the previous one, and completion is reported back into the event queue as
//!   [`AssistantEvent::PlaybackComplete`].

use crate::assistant::AssistantEvent;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

/// Failures surfaced by the speech subsystems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech recognition is not available on this host")]
    RecognitionUnavailable,
    #[error("Speech synthesis is not available on this host")]
    SynthesisUnavailable,
}

/// A finalized piece of recognized speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerState {
    Idle,
    Listening,
}

/// The recognizer side: a long-lived listener started and stopped by the user.
#[derive(Debug)]
pub struct SpeechInput {
    supported: bool,
    state: ListenerState,
    transcript: String,
    transcript_is_final: bool,
}

impl SpeechInput {
    /// A listener backed by a working recognizer.
    pub fn new() -> Self {
        Self::with_support(true)
    }

    /// A listener on a host without speech recognition; it can never start.
    pub fn unsupported() -> Self {
        Self::with_support(false)
    }

    pub fn with_support(supported: bool) -> Self {
        Self {
            supported,
            state: ListenerState::Idle,
            transcript: String::new(),
            transcript_is_final: false,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == ListenerState::Listening
    }

    /// The transcript currently on display (interim or final).
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Starts listening. Returns `Ok(false)` if already listening.
    pub fn start(&mut self) -> Result<bool, SpeechError> {
        if !self.supported {
            return Err(SpeechError::RecognitionUnavailable);
        }
        if self.is_listening() {
            return Ok(false);
        }
        self.state = ListenerState::Listening;
        self.transcript.clear();
        self.transcript_is_final = false;
        Ok(true)
    }

    /// Stops listening and drops any interim transcript. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_listening() {
            return false;
        }
        self.state = ListenerState::Idle;
        if !self.transcript_is_final {
            self.transcript.clear();
        }
        true
    }

    /// Feeds one recognition result. Only a final result while listening yields an utterance.
    pub fn on_result(&mut self, is_final: bool, text: &str) -> Option<Utterance> {
        if !self.is_listening() {
            debug!(is_final, "Dropping recognition result received while idle");
            return None;
        }
        self.transcript = text.to_string();
        self.transcript_is_final = is_final;
        is_final.then(|| Utterance::new(text))
    }
}

impl Default for SpeechInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Host text-to-speech engine.
///
/// `play` resolves once the text has been fully spoken. `halt` silences the
/// engine immediately; it is called after an in-flight `play` was aborted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn play(&self, text: &str) -> anyhow::Result<()>;

    async fn halt(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Speaking { id: u64 },
}

/// The playback side: one audible utterance at a time, fire-and-forget.
pub struct SpeechOutput {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    events: mpsc::WeakSender<AssistantEvent>,
    state: PlaybackState,
    in_flight: Option<JoinHandle<()>>,
    next_id: u64,
}

impl SpeechOutput {
    /// `events` is the assistant's event queue; completions are posted to it.
    /// Only a weak handle is kept so the queue still closes when its owners drop.
    pub fn new(
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
        events: &mpsc::Sender<AssistantEvent>,
    ) -> Self {
        Self {
            synthesizer,
            events: events.downgrade(),
            state: PlaybackState::Idle,
            in_flight: None,
            next_id: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, PlaybackState::Speaking { .. })
    }

    /// Starts speaking `text`, cancelling whatever was playing. Returns the playback id.
    pub async fn speak(&mut self, text: &str) -> Result<u64, SpeechError> {
        let synthesizer = self
            .synthesizer
            .clone()
            .ok_or(SpeechError::SynthesisUnavailable)?;
        self.cancel().await;

        self.next_id += 1;
        let id = self.next_id;
        let events = self.events.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            if let Err(e) = synthesizer.play(&text).await {
                warn!(error = %e, playback_id = id, "Speech playback failed");
            }
            match events.upgrade() {
                Some(tx) => {
                    if tx.send(AssistantEvent::PlaybackComplete(id)).await.is_err() {
                        debug!(playback_id = id, "Assistant loop gone before playback completed");
                    }
                }
                None => debug!(playback_id = id, "Assistant loop gone before playback completed"),
            }
        });

        self.in_flight = Some(handle);
        self.state = PlaybackState::Speaking { id };
        Ok(id)
    }

    /// Truncates the current playback. No completion is reported for it.
    /// Returns `false` if nothing was playing.
    pub async fn cancel(&mut self) -> bool {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        let was_speaking = self.is_speaking();
        self.state = PlaybackState::Idle;
        if was_speaking {
            if let Some(synthesizer) = &self.synthesizer {
                synthesizer.halt().await;
            }
        }
        was_speaking
    }

    /// Handles a completion signal. Stale ids from cancelled playbacks are ignored.
    pub fn on_complete(&mut self, id: u64) -> bool {
        match self.state {
            PlaybackState::Speaking { id: current } if current == id => {
                self.state = PlaybackState::Idle;
                self.in_flight = None;
                true
            }
            _ => {
                debug!(playback_id = id, "Ignoring completion for superseded playback");
                false
            }
        }
    }
}

impl Drop for SpeechOutput {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

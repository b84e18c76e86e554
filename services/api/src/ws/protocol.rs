//! Defines the WebSocket message protocol between the browser client and the API server.
//!
//! The browser owns the microphone and the speaker: it forwards recognition
//! results as `transcription` messages and plays `speak_text` requests,
//! answering each with a `playback_ended` that echoes the request's `id`.

use assistant_core::assistant::{AssistantEvent, AssistantUpdate};
use serde::{Deserialize, Serialize};

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The user pressed the microphone button.
    StartListening,
    /// The user released the microphone button.
    StopListening,
    /// A recognition result from the browser's recognizer.
    Transcription {
        text: String,
        #[serde(default)]
        is_final: bool,
    },
    /// Speak arbitrary text without interpreting it.
    Speak { text: String },
    /// Stop the current playback.
    StopSpeaking,
    /// The `speak_text` with this id finished playing or was stopped.
    PlaybackEnded { id: u64 },
}

impl ClientMessage {
    /// Maps the message onto an assistant event. `PlaybackEnded` is answered by
    /// the synthesizer rather than the assistant, so it has none.
    pub fn into_event(self) -> Option<AssistantEvent> {
        match self {
            ClientMessage::StartListening => Some(AssistantEvent::StartListening),
            ClientMessage::StopListening => Some(AssistantEvent::StopListening),
            ClientMessage::Transcription { text, is_final } => {
                Some(AssistantEvent::Recognition { text, is_final })
            }
            ClientMessage::Speak { text } => Some(AssistantEvent::Speak(text)),
            ClientMessage::StopSpeaking => Some(AssistantEvent::StopSpeaking),
            ClientMessage::PlaybackEnded { .. } => None,
        }
    }
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The visible transcript changed.
    Transcript { text: String, is_final: bool },
    /// The assistant's reply to a final utterance.
    Response { text: String },
    Listening { active: bool },
    Speaking { active: bool },
    /// The client should play this text and answer with `playback_ended` for `id`.
    SpeakText { id: u64, text: String },
    /// The client should stop playing immediately. `id` names the playback
    /// being cut short, if one had been requested.
    CancelSpeech {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },
    /// A speech capability is missing on this host.
    Unavailable { message: String },
    /// Reports a malformed or unexpected message.
    Error { message: String },
}

impl From<AssistantUpdate> for ServerMessage {
    fn from(update: AssistantUpdate) -> Self {
        match update {
            AssistantUpdate::Transcript { text, is_final } => {
                ServerMessage::Transcript { text, is_final }
            }
            AssistantUpdate::Response { text } => ServerMessage::Response { text },
            AssistantUpdate::Listening { active } => ServerMessage::Listening { active },
            AssistantUpdate::Speaking { active } => ServerMessage::Speaking { active },
            AssistantUpdate::Unavailable { message } => ServerMessage::Unavailable { message },
        }
    }
}

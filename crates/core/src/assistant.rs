//! Voice Assistant Runtime
//!
//! Ties the speech input, the command interpreter and the speech output
//! together behind a single event queue. The host (a WebSocket session, a
//! terminal, a test) feeds [`AssistantEvent`]s in; the assistant processes them
//! one at a time, so none of its state needs locking. Observers can subscribe
//! to [`AssistantUpdate`]s to mirror what the assistant is doing.

use crate::{
    history::{BoundedHistory, COMMAND_HISTORY_CAPACITY},
    interpreter::CommandInterpreter,
    speech::{SpeechInput, SpeechOutput, Utterance},
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Suggested depth for the assistant's event queue.
pub const EVENT_QUEUE_DEPTH: usize = 64;

/// Inputs to the assistant. Each variant is one transition of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// Start the recognizer.
    StartListening,
    /// Stop the recognizer, discarding any interim transcript.
    StopListening,
    /// A recognition result from the speech-to-text source.
    Recognition { text: String, is_final: bool },
    /// Speak arbitrary text, bypassing the interpreter.
    Speak(String),
    /// Truncate whatever is being spoken.
    StopSpeaking,
    /// The playback with this id finished on its own.
    PlaybackComplete(u64),
}

/// Notifications for whoever renders the assistant's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantUpdate {
    Transcript { text: String, is_final: bool },
    Response { text: String },
    Listening { active: bool },
    Speaking { active: bool },
    Unavailable { message: String },
}

pub struct VoiceAssistant {
    interpreter: CommandInterpreter,
    input: SpeechInput,
    output: SpeechOutput,
    commands: BoundedHistory<String>,
    last_response: Option<String>,
    updates: Option<mpsc::Sender<AssistantUpdate>>,
}

impl VoiceAssistant {
    pub fn new(interpreter: CommandInterpreter, input: SpeechInput, output: SpeechOutput) -> Self {
        Self {
            interpreter,
            input,
            output,
            commands: BoundedHistory::new(COMMAND_HISTORY_CAPACITY),
            last_response: None,
            updates: None,
        }
    }

    /// Broadcasts every state change on `updates`.
    pub fn with_updates(mut self, updates: mpsc::Sender<AssistantUpdate>) -> Self {
        self.updates = Some(updates);
        self
    }

    pub fn is_listening(&self) -> bool {
        self.input.is_listening()
    }

    pub fn is_speaking(&self) -> bool {
        self.output.is_speaking()
    }

    pub fn transcript(&self) -> &str {
        self.input.transcript()
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// The most recent recognized commands, oldest first.
    pub fn command_history(&self) -> &BoundedHistory<String> {
        &self.commands
    }

    /// Processes events until every sender of `events` is dropped.
    pub async fn run(&mut self, mut events: mpsc::Receiver<AssistantEvent>) {
        info!("Voice assistant loop started");
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
        self.output.cancel().await;
        info!("Voice assistant loop finished");
    }

    /// Applies a single event. Returns the reply if the event produced one.
    pub async fn handle(&mut self, event: AssistantEvent) -> Option<String> {
        match event {
            AssistantEvent::StartListening => match self.input.start() {
                Ok(true) => {
                    info!("Listening started");
                    self.notify(AssistantUpdate::Listening { active: true }).await;
                }
                Ok(false) => debug!("Start requested while already listening"),
                Err(e) => {
                    warn!(error = %e, "Cannot start listening");
                    self.notify(AssistantUpdate::Unavailable {
                        message: e.to_string(),
                    })
                    .await;
                }
            },
            AssistantEvent::StopListening => {
                if self.input.stop() {
                    info!("Listening stopped");
                    self.notify(AssistantUpdate::Listening { active: false }).await;
                }
            }
            AssistantEvent::Recognition { text, is_final } => {
                if !self.input.is_listening() {
                    debug!("Recognition result while not listening; ignored");
                    return None;
                }
                let utterance = self.input.on_result(is_final, &text);
                self.notify(AssistantUpdate::Transcript { text, is_final }).await;
                if let Some(utterance) = utterance {
                    return Some(self.respond_to(utterance).await);
                }
            }
            AssistantEvent::Speak(text) => self.say(&text).await,
            AssistantEvent::StopSpeaking => {
                if self.output.cancel().await {
                    self.notify(AssistantUpdate::Speaking { active: false }).await;
                }
            }
            AssistantEvent::PlaybackComplete(id) => {
                if self.output.on_complete(id) {
                    self.notify(AssistantUpdate::Speaking { active: false }).await;
                }
            }
        }
        None
    }

    async fn respond_to(&mut self, utterance: Utterance) -> String {
        let command = utterance.into_inner();
        let response = self.interpreter.interpret(&command);
        info!(command = %command, response = %response, "Voice command handled");

        self.commands.push(command);
        self.last_response = Some(response.clone());
        self.notify(AssistantUpdate::Response {
            text: response.clone(),
        })
        .await;
        self.say(&response).await;
        response
    }

    /// Fire-and-forget playback; failures are logged and reported, never returned.
    async fn say(&mut self, text: &str) {
        match self.output.speak(text).await {
            Ok(id) => {
                debug!(playback_id = id, "Playback requested");
                self.notify(AssistantUpdate::Speaking { active: true }).await;
            }
            Err(e) => {
                warn!(error = %e, "Skipping speech output");
                self.notify(AssistantUpdate::Unavailable {
                    message: e.to_string(),
                })
                .await;
            }
        }
    }

    async fn notify(&self, update: AssistantUpdate) {
        if let Some(tx) = &self.updates {
            if tx.send(update).await.is_err() {
                warn!("Failed to broadcast assistant update: receiver dropped.");
            }
        }
    }
}

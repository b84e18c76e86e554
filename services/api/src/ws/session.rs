//! Manages the WebSocket connection lifecycle for a voice session.

use super::{
    protocol::{ClientMessage, ServerMessage},
    speech::ClientSynthesizer,
};
use crate::state::AppState;
use anyhow::Result;
use assistant_core::{
    assistant::{AssistantEvent, AssistantUpdate, EVENT_QUEUE_DEPTH, VoiceAssistant},
    speech::{SpeechInput, SpeechOutput, SpeechSynthesizer},
};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, instrument, warn};

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
///
/// Each connection gets its own assistant: the browser is both the recognizer
/// and the synthesizer, and the server owns the interpretation and the state.
#[instrument(name = "ws_session", skip_all, fields(session_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id: u32 = rand::random();
    tracing::Span::current().record("session_id", session_id);
    info!("New voice session connected.");

    let (socket_tx, socket_rx) = socket.split();

    if let Err(e) = run_voice_session(state, socket_tx, socket_rx).await {
        error!(error = ?e, "Voice session terminated with error.");
    }
    info!("Voice session finished.");
}

/// The main event loop for an active voice session.
///
/// The session runs as three tasks joined by channels: this reader turns client
/// messages into assistant events, the assistant task consumes them, and a
/// writer task owns the socket sink. The writer drains assistant updates and
/// synthesizer requests independently of the reader, so a client flooding the
/// socket can never leave the assistant blocked on a full update queue.
async fn run_voice_session(
    state: Arc<AppState>,
    socket_tx: SplitSink<WebSocket, Message>,
    mut socket_rx: SplitStream<WebSocket>,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<AssistantEvent>(EVENT_QUEUE_DEPTH);
    let (update_tx, update_rx) = mpsc::channel::<AssistantUpdate>(EVENT_QUEUE_DEPTH);
    let (outbound_tx, outbound_rx) = mpsc::channel::<ServerMessage>(EVENT_QUEUE_DEPTH);

    let writer_handle = tokio::spawn(
        write_to_client(state.clone(), socket_tx, update_rx, outbound_rx)
            .instrument(tracing::Span::current()),
    );

    let synthesizer = state
        .config
        .speech_synthesis
        .then(|| Arc::new(ClientSynthesizer::new(outbound_tx.clone())));
    let input = SpeechInput::with_support(state.config.speech_recognition);
    let output = SpeechOutput::new(
        synthesizer
            .clone()
            .map(|s| s as Arc<dyn SpeechSynthesizer>),
        &event_tx,
    );

    let mut assistant =
        VoiceAssistant::new(state.interpreter.clone(), input, output).with_updates(update_tx);
    let assistant_handle = tokio::spawn(
        async move { assistant.run(event_rx).await }.instrument(tracing::Span::current()),
    );

    while let Some(msg_result) = socket_rx.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::PlaybackEnded { id }) => {
                    if let Some(synthesizer) = &synthesizer {
                        synthesizer.finish(id);
                    }
                }
                Ok(msg) => {
                    if let Some(event) = msg.into_event() {
                        if event_tx.send(event).await.is_err() {
                            warn!("Assistant loop is gone; closing session.");
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed client message.");
                    let reply = ServerMessage::Error {
                        message: format!("Invalid message: {}", e),
                    };
                    if outbound_tx.send(reply).await.is_err() {
                        warn!("Session writer is gone; closing session.");
                        break;
                    }
                }
            },
            Ok(Message::Binary(_)) => {
                warn!("Ignoring binary frame; this session expects JSON text.")
            }
            Ok(Message::Close(_)) => {
                info!("Client sent close frame. Shutting down session.");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                error!("Error receiving from client WebSocket: {:?}", e);
                break;
            }
        }
    }

    // Closing the event queue ends the assistant loop, which cancels any playback.
    // The writer stops once the assistant and the synthesizer drop their senders.
    drop(event_tx);
    drop(outbound_tx);
    drop(synthesizer);
    if let Err(e) = assistant_handle.await {
        error!(error = ?e, "Assistant task panicked.");
    }
    if let Err(e) = writer_handle.await {
        error!(error = ?e, "Session writer task panicked.");
    }
    info!("WebSocket connection closed and voice session terminated.");
    Ok(())
}

/// Owns the socket sink: mirrors assistant updates and forwards synthesizer
/// requests until both sources close or the client stops accepting frames.
async fn write_to_client(
    state: Arc<AppState>,
    mut socket_tx: SplitSink<WebSocket, Message>,
    mut update_rx: mpsc::Receiver<AssistantUpdate>,
    mut outbound_rx: mpsc::Receiver<ServerMessage>,
) {
    loop {
        let msg = tokio::select! {
            Some(update) = update_rx.recv() => {
                if let AssistantUpdate::Transcript { text, is_final: true } = &update {
                    state.voice_history.lock().await.push(text.clone());
                }
                ServerMessage::from(update)
            },
            Some(msg) = outbound_rx.recv() => msg,
            else => break,
        };
        if let Err(e) = send_msg(&mut socket_tx, msg).await {
            warn!(error = %e, "Client stopped accepting messages.");
            return;
        }
    }
    // The client may already be gone; a failed close needs no report.
    let _ = socket_tx.close().await;
}

/// A helper function to serialize and send a `ServerMessage` to the client.
async fn send_msg(socket_tx: &mut SplitSink<WebSocket, Message>, msg: ServerMessage) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}

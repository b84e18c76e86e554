//! WebSocket Voice Sessions
//!
//! This module runs a voice assistant per WebSocket connection. It is
//! structured into submodules:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `session`: Manages the WebSocket connection lifecycle, from upgrade to termination.
//! - `speech`: A synthesizer that asks the client to do the actual playback.

pub mod protocol;
pub mod session;
mod speech;

pub use session::ws_handler;

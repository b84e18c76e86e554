//! Voice Assistant API Library Crate
//!
//! This library contains the web service for the assistant dashboard:
//! configuration, the shared application state, REST handlers, the voice
//! WebSocket and routing. The binaries are thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;

//! Core logic for the voice assistant dashboard.
//!
//! The centerpiece is the [`assistant`] runtime: recognized speech flows from
//! [`speech::SpeechInput`] through the keyword [`interpreter`] and back out via
//! [`speech::SpeechOutput`]. The remaining modules model the companion panels
//! (HTTP probe, module registry, metrics, screen control, documentation).

pub mod assistant;
pub mod docs;
pub mod history;
pub mod interpreter;
pub mod metrics;
pub mod probe;
pub mod registry;
pub mod screen;
pub mod speech;

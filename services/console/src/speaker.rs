//! A synthesizer that "speaks" by printing and taking time proportional to the text.

use anyhow::Result;
use assistant_core::speech::SpeechSynthesizer;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct ConsoleSpeaker {
    per_char: Duration,
}

impl ConsoleSpeaker {
    pub fn new(per_char: Duration) -> Self {
        Self { per_char }
    }

    /// How long `text` takes to "play", capped at `Duration::MAX`.
    pub fn playback_time(&self, text: &str) -> Duration {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        self.per_char.saturating_mul(chars)
    }
}

#[async_trait]
impl SpeechSynthesizer for ConsoleSpeaker {
    async fn play(&self, text: &str) -> Result<()> {
        println!("assistant> {text}");
        let duration = self.playback_time(text);
        debug!(?duration, "Simulating playback");
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn halt(&self) {
        println!("assistant> (stopped speaking)");
    }
}
